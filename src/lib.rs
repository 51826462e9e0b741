//! Worko Backend Library
//!
//! User management API: registration, login with JWT sessions, role-gated
//! listing, updates and soft deletes over a MongoDB user collection.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod users;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use error::ApiError;
