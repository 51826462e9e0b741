//! In-process user store.
//!
//! Mirrors the document semantics of [`MongoUserStore`](super::mongo_store::MongoUserStore)
//! (unique email, soft delete, creation ordering) without a database. Used by
//! tests and by `--store memory` for local development.

use crate::users::models::{ListQuery, User, UserUpdate};
use crate::users::store::{StoreError, StoreResult, UserStore};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct MemoryUserStore {
    // Insertion order doubles as creation order.
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_active_by_id(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.id == *id && u.is_active)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.email == email).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.email == email && u.is_active)
            .cloned())
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<(Vec<User>, u64)> {
        let users = self.users.read();
        let matching: Vec<&User> = users
            .iter()
            .filter(|u| !query.only_active || u.is_active)
            .collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }
        users.push(user.clone());
        debug!(user_id = %user.id, "Inserted user into memory store");
        Ok(())
    }

    async fn update_active(
        &self,
        id: &ObjectId,
        update: &UserUpdate,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.write();
        Ok(users
            .iter_mut()
            .find(|u| u.id == *id && u.is_active)
            .map(|user| {
                update.apply(user, DateTime::now());
                user.clone()
            }))
    }

    async fn reactivate(&self, id: &ObjectId, password_hash: &str) -> StoreResult<Option<User>> {
        let mut users = self.users.write();
        Ok(users.iter_mut().find(|u| u.id == *id).map(|user| {
            user.is_active = true;
            user.password_hash = password_hash.to_string();
            user.updated_at = DateTime::now();
            user.clone()
        }))
    }

    async fn deactivate(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut users = self.users.write();
        match users.iter_mut().find(|u| u.id == *id && u.is_active) {
            Some(user) => {
                user.is_active = false;
                user.updated_at = DateTime::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
