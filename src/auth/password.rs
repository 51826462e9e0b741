//! Password hashing
//! Mission: bcrypt hashing kept off the async executor threads

use anyhow::{Context, Result};
use bcrypt::{hash, verify};

/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Hash a password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")
}

/// Check a plaintext password against a stored bcrypt hash.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .context("Password verification task failed")?
        .context("Failed to verify password")
}
