//! User documents and the shapes derived from them.

use crate::auth::models::{AuthProvider, UserRole};
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the collection holding [`User`] documents.
pub const USER_COLLECTION: &str = "users";

/// A user account as stored in the `users` collection.
///
/// This type is never serialized to clients; handlers answer with
/// [`UserResponse`] so the password hash and reset token stay server side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String, // bcrypt hash
    pub age: i64,
    pub city: String,
    pub zip_code: i64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_active")]
    pub is_active: bool, // false once soft deleted
    #[serde(default)]
    pub password_reset_token: Option<String>,
    #[serde(default)]
    pub password_reset_token_expire: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Build a freshly registered local account from validated input.
    pub fn new_local(new_user: NewUser, password_hash: String) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            name: new_user.name,
            email: new_user.email,
            password_hash,
            age: new_user.age,
            city: new_user.city,
            zip_code: new_user.zip_code,
            phone: new_user.phone,
            google_id: new_user.google_id,
            provider: AuthProvider::Local,
            role: UserRole::User,
            is_verified: false,
            is_active: true,
            password_reset_token: None,
            password_reset_token_expire: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated registration data. The password is still plaintext here.
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i64,
    pub city: String,
    pub zip_code: i64,
    pub phone: Option<String>,
    pub google_id: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .field("city", &self.city)
            .field("zip_code", &self.zip_code)
            .field("phone", &self.phone)
            .field("google_id", &self.google_id)
            .finish()
    }
}

/// Validated partial profile update.
///
/// `phone` is tri-state: `None` leaves it alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub zip_code: Option<i64>,
    pub phone: Option<Option<String>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.city.is_none()
            && self.zip_code.is_none()
            && self.phone.is_none()
    }

    /// The `$set` body for this update, stamped with `updatedAt`.
    pub fn to_set_document(&self, now: DateTime) -> Document {
        let mut set = doc! { "updatedAt": now };
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(age) = self.age {
            set.insert("age", age);
        }
        if let Some(city) = &self.city {
            set.insert("city", city.as_str());
        }
        if let Some(zip_code) = self.zip_code {
            set.insert("zipCode", zip_code);
        }
        if let Some(phone) = &self.phone {
            set.insert("phone", phone.clone());
        }
        set
    }

    /// Apply the update to an in-memory document.
    pub fn apply(&self, user: &mut User, now: DateTime) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(age) = self.age {
            user.age = age;
        }
        if let Some(city) = &self.city {
            user.city = city.clone();
        }
        if let Some(zip_code) = self.zip_code {
            user.zip_code = zip_code;
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        user.updated_at = now;
    }
}

/// User response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub city: String,
    pub zip_code: i64,
    pub phone: Option<String>,
    pub google_id: Option<String>,
    pub provider: AuthProvider,
    pub role: UserRole,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            city: user.city.clone(),
            zip_code: user.zip_code,
            phone: user.phone.clone(),
            google_id: user.google_id.clone(),
            provider: user.provider,
            role: user.role,
            is_verified: user.is_verified,
            is_active: user.is_active,
            created_at: user.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: user.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination and filtering for user listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub only_active: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            only_active: false,
        }
    }
}

impl ListQuery {
    /// Clamp raw query values: page starts at 1, limit stays within 1..=100.
    pub fn new(page: Option<u64>, limit: Option<u64>, only_active: bool) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
            only_active,
        }
    }

    /// Documents to skip; saturates at `i64::MAX`, the largest skip MongoDB accepts.
    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

/// One page of a user listing
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_users: u64,
    pub current_page: u64,
}
