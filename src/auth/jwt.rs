//! JWT Token Handler
//! Mission: Issue and validate access and refresh tokens with separate secrets

use crate::auth::models::{AccessClaims, RefreshClaims, UserRole};
use crate::users::models::User;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::debug;

/// Secrets and lifetimes for both token kinds
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// JWT Handler for token operations
pub struct JwtHandler {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtHandler {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        let (iat, exp) = issued_and_expiry(self.access_ttl);
        let claims = AccessClaims {
            user_id: user.id.to_hex(),
            email: user.email.clone(),
            role: (user.role == UserRole::Admin).then_some(UserRole::Admin),
            iat,
            exp,
        };

        debug!(
            "Generating access token for user {}, expires in {}s",
            user.id,
            self.access_ttl.as_secs()
        );

        encode(&Header::default(), &claims, &self.access_encoding)
            .context("Failed to generate access token")
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user: &User) -> Result<String> {
        let (iat, exp) = issued_and_expiry(self.refresh_ttl);
        let claims = RefreshClaims {
            user_id: user.id.to_hex(),
            email: user.email.clone(),
            iat,
            exp,
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .context("Failed to generate refresh token")
    }

    /// Validate an access token and extract claims
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims> {
        let decoded = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())
            .context("Invalid or expired access token")?;

        debug!("Validated access token for user {}", decoded.claims.user_id);

        Ok(decoded.claims)
    }

    /// Validate a refresh token and extract claims
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let decoded = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())
            .context("Invalid or expired refresh token")?;
        Ok(decoded.claims)
    }
}

fn issued_and_expiry(ttl: Duration) -> (usize, usize) {
    let now = Utc::now().timestamp() as usize;
    (now, now + ttl.as_secs() as usize)
}
