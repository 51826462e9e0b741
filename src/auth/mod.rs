//! Authentication Module
//! Mission: Secure API access with hashed passwords, JWT tokens and RBAC

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{JwtConfig, JwtHandler};
pub use middleware::{auth_middleware, require_admin};
pub use models::{AccessClaims, UserRole};
