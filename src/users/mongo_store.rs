//! MongoDB-backed user store.

use crate::users::models::{ListQuery, User, UserUpdate, USER_COLLECTION};
use crate::users::store::{StoreError, StoreResult, UserStore};
use anyhow::Context;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use tracing::info;

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    /// Connect, verify the server answers, and make sure the email index exists.
    ///
    /// The database named in the URI wins over `default_db`.
    pub async fn connect(uri: &str, default_db: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(default_db));

        db.run_command(doc! { "ping": 1 })
            .await
            .context("Failed to reach MongoDB")?;
        info!(database = db.name(), "Connected to MongoDB");

        let store = Self {
            users: db.collection(USER_COLLECTION),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users
            .create_index(email_index)
            .await
            .context("Failed to create unique email index")?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<User>> {
        Ok(self.users.find_one(filter).await?)
    }

    async fn update_one(&self, filter: Document, set: Document) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY
    )
}

fn list_filter(query: &ListQuery) -> Document {
    if query.only_active {
        doc! { "isActive": true }
    } else {
        doc! {}
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_active_by_id(&self, id: &ObjectId) -> StoreResult<Option<User>> {
        self.find_one(doc! { "_id": *id, "isActive": true }).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one(doc! { "email": email }).await
    }

    async fn find_active_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one(doc! { "email": email, "isActive": true }).await
    }

    async fn list(&self, query: &ListQuery) -> StoreResult<(Vec<User>, u64)> {
        let filter = list_filter(query);
        let total = self.users.count_documents(filter.clone()).await?;
        let users: Vec<User> = self
            .users
            .find(filter)
            .sort(doc! { "createdAt": 1 })
            .skip(query.skip())
            .limit(query.limit as i64)
            .await?
            .try_collect()
            .await?;
        Ok((users, total))
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        match self.users.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate("email".to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_active(
        &self,
        id: &ObjectId,
        update: &UserUpdate,
    ) -> StoreResult<Option<User>> {
        self.update_one(
            doc! { "_id": *id, "isActive": true },
            update.to_set_document(DateTime::now()),
        )
        .await
    }

    async fn reactivate(&self, id: &ObjectId, password_hash: &str) -> StoreResult<Option<User>> {
        self.update_one(
            doc! { "_id": *id },
            doc! {
                "isActive": true,
                "password": password_hash,
                "updatedAt": DateTime::now(),
            },
        )
        .await
    }

    async fn deactivate(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .users
            .update_one(
                doc! { "_id": *id, "isActive": true },
                doc! { "$set": { "isActive": false, "updatedAt": DateTime::now() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
