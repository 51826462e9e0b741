//! User accounts: document model, validation, storage backends and the
//! service that enforces soft-delete and uniqueness rules.

pub mod memory_store;
pub mod models;
pub mod mongo_store;
pub mod service;
pub mod store;
pub mod validation;

pub use memory_store::MemoryUserStore;
pub use mongo_store::MongoUserStore;
pub use service::UserService;
pub use store::{StoreError, UserStore};
