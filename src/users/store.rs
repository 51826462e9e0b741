//! User Storage
//! Mission: Document-level access to user accounts, independent of the backend

use crate::users::models::{ListQuery, User, UserUpdate};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write; carries the offending field.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations on the `users` collection.
///
/// Soft-deleted accounts (`isActive: false`) stay in the collection; only the
/// methods named `*_active` filter them out.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_active_by_id(&self, id: &ObjectId) -> StoreResult<Option<User>>;

    /// Lookup regardless of the active flag, used to detect re-registration.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_active_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// One page ordered by creation time, plus the number of documents
    /// matching the same filter.
    async fn list(&self, query: &ListQuery) -> StoreResult<(Vec<User>, u64)>;

    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn update_active(&self, id: &ObjectId, update: &UserUpdate)
        -> StoreResult<Option<User>>;

    async fn reactivate(&self, id: &ObjectId, password_hash: &str) -> StoreResult<Option<User>>;

    /// Returns whether an active document with this id was deactivated.
    async fn deactivate(&self, id: &ObjectId) -> StoreResult<bool>;
}
