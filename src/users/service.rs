//! User account operations: registration, login, listing, update, soft delete.

use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;
use crate::users::models::{ListQuery, NewUser, User, UserPage, UserUpdate};
use crate::users::store::UserStore;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{info, warn};

pub struct UserService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    pub async fn get_user(&self, id: &ObjectId) -> Result<User, ApiError> {
        self.store
            .find_active_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    pub async fn list_users(&self, query: ListQuery) -> Result<UserPage, ApiError> {
        let (users, total_users) = self.store.list(&query).await?;
        Ok(UserPage {
            users,
            total_users,
            current_page: query.page,
        })
    }

    /// Register a user, or bring a soft-deleted account with the same email
    /// back to life with the new password.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, ApiError> {
        if let Some(existing) = self.store.find_by_email(&new_user.email).await? {
            if existing.is_active {
                warn!(email = %new_user.email, "Registration rejected: email already in use");
                return Err(ApiError::Duplicate("email".to_string()));
            }

            let password_hash = hash_password(new_user.password, self.bcrypt_cost).await?;
            let user = self
                .store
                .reactivate(&existing.id, &password_hash)
                .await?
                .ok_or(ApiError::UserNotFound)?;
            info!(user_id = %user.id, "Reactivated soft-deleted user");
            return Ok(user);
        }

        let password_hash = hash_password(new_user.password.clone(), self.bcrypt_cost).await?;
        let user = User::new_local(new_user, password_hash);
        self.store.insert(&user).await?;

        info!(user_id = %user.id, role = user.role.as_str(), "Created user");
        Ok(user)
    }

    /// Returns `true` once the active account has been updated.
    pub async fn update_user(&self, id: &ObjectId, update: &UserUpdate) -> Result<bool, ApiError> {
        let user = self
            .store
            .update_active(id, update)
            .await?
            .ok_or(ApiError::UpdateTargetNotFound)?;
        info!(user_id = %user.id, "Updated user");
        Ok(true)
    }

    /// Soft delete; returns whether an active account was deactivated.
    pub async fn delete_user(&self, id: &ObjectId) -> Result<bool, ApiError> {
        let deleted = self.store.deactivate(id).await?;
        if deleted {
            info!(user_id = %id, "Soft-deleted user");
        }
        Ok(deleted)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.store.find_active_by_email(&email).await? else {
            warn!(email = %email, "Failed login attempt: unknown or inactive account");
            return Err(ApiError::InvalidCredentials);
        };

        let valid = verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            warn!(user_id = %user.id, "Failed login attempt: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        info!(user_id = %user.id, role = user.role.as_str(), "Login successful");
        Ok(user)
    }

    /// Active account behind a refresh token; gone or deactivated accounts
    /// can no longer refresh.
    pub async fn refresh_user(&self, id: &ObjectId) -> Result<User, ApiError> {
        self.store
            .find_active_by_id(id)
            .await?
            .ok_or(ApiError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory_store::MemoryUserStore;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserStore::new()), 4)
    }

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            age: 21,
            city: "Test City".to_string(),
            zip_code: 220112,
            phone: Some("8840861716".to_string()),
            google_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let service = service();
        let user = service
            .create_user(new_user("test@test.com", "password123"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(user.is_active);

        let fetched = service.get_user(&user.id).await.unwrap();
        assert_eq!(fetched.email, "test@test.com");
    }

    #[tokio::test]
    async fn test_duplicate_active_email_rejected() {
        let service = service();
        service
            .create_user(new_user("test@test.com", "password123"))
            .await
            .unwrap();

        let err = service
            .create_user(new_user("test@test.com", "other-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(ref f) if f == "email"));
    }

    #[tokio::test]
    async fn test_login() {
        let service = service();
        service
            .create_user(new_user("test@test.com", "password123"))
            .await
            .unwrap();

        let user = service
            .login_user(" Test@Test.com", "password123")
            .await
            .unwrap();
        assert_eq!(user.email, "test@test.com");

        let err = service
            .login_user("test@test.com", "wrong-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let err = service
            .login_user("nobody@test.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_soft_delete_then_reregister() {
        let service = service();
        let user = service
            .create_user(new_user("test@test.com", "password123"))
            .await
            .unwrap();

        assert!(service.delete_user(&user.id).await.unwrap());
        assert!(matches!(
            service.get_user(&user.id).await.unwrap_err(),
            ApiError::UserNotFound
        ));
        assert!(matches!(
            service.login_user("test@test.com", "password123").await.unwrap_err(),
            ApiError::InvalidCredentials
        ));

        let revived = service
            .create_user(new_user("test@test.com", "brand-new-pass"))
            .await
            .unwrap();
        assert_eq!(revived.id, user.id);
        assert!(revived.is_active);

        assert!(service
            .login_user("test@test.com", "brand-new-pass")
            .await
            .is_ok());
        assert!(service
            .login_user("test@test.com", "password123")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_and_missing_user() {
        let service = service();
        let user = service
            .create_user(new_user("test@test.com", "password123"))
            .await
            .unwrap();

        let update = UserUpdate {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(service.update_user(&user.id, &update).await.unwrap());
        assert_eq!(service.get_user(&user.id).await.unwrap().name, "Renamed");

        let err = service
            .update_user(&ObjectId::new(), &update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UpdateTargetNotFound));

        assert!(!service.delete_user(&ObjectId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_users_reports_current_page() {
        let service = service();
        for i in 0..3 {
            service
                .create_user(new_user(&format!("user{}@test.com", i), "password123"))
                .await
                .unwrap();
        }

        let page = service
            .list_users(ListQuery::new(Some(2), Some(2), false))
            .await
            .unwrap();
        assert_eq!(page.total_users, 3);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.users.len(), 1);
    }
}
