//! Runtime configuration.
//!
//! Every setting is a CLI flag with an environment variable fallback, so a
//! `.env` file is enough to run the server.
//!
//! Environment:
//!   PORT, HOST                    - listen address (default 0.0.0.0:3000)
//!   USER_STORE                    - `mongo` (default) or `memory`
//!   MONGO_URI, MONGO_DB           - MongoDB connection (db default: worko)
//!   ACCESS_TOKEN_SECRET           - HMAC secret for access tokens
//!   REFRESH_TOKEN_SECRET          - HMAC secret for refresh tokens
//!   JWT_ACCESS_TOKEN_EXPIRE       - access token lifetime (default 15m)
//!   JWT_REFRESH_TOKEN_EXPIRE      - refresh token lifetime (default 7d)
//!   COOKIE_EXPIRE                 - refresh cookie lifetime in days (default 7)
//!   APP_ENV                       - development | staging | production
//!   CORS_ORIGINS                  - comma-separated allowed origins
//!   BCRYPT_COST                   - bcrypt work factor (default 10)

use crate::auth::jwt::JwtConfig;
use crate::auth::password::{DEFAULT_BCRYPT_COST, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppEnv {
    Development,
    Staging,
    Production,
}

#[derive(Parser, Clone)]
#[command(name = "worko")]
#[command(about = "User management API with JWT sessions")]
pub struct AppConfig {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Storage backend for user documents
    #[arg(long, env = "USER_STORE", value_enum, default_value = "mongo")]
    pub store: StoreKind,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Database used when the connection string names none
    #[arg(long, env = "MONGO_DB", default_value = "worko")]
    pub mongo_db: String,

    /// Secret for signing access tokens
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub access_token_secret: String,

    /// Secret for signing refresh tokens
    #[arg(long, env = "REFRESH_TOKEN_SECRET", hide_env_values = true)]
    pub refresh_token_secret: String,

    /// Access token lifetime, e.g. `15m`, `1h`
    #[arg(long, env = "JWT_ACCESS_TOKEN_EXPIRE", default_value = "15m", value_parser = humantime::parse_duration)]
    pub access_token_ttl: Duration,

    /// Refresh token lifetime, e.g. `7d`
    #[arg(long, env = "JWT_REFRESH_TOKEN_EXPIRE", default_value = "7d", value_parser = humantime::parse_duration)]
    pub refresh_token_ttl: Duration,

    /// Refresh cookie lifetime in days
    #[arg(long, env = "COOKIE_EXPIRE", default_value = "7")]
    pub cookie_expire_days: u32,

    /// Deployment environment; `production` marks cookies Secure
    #[arg(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub app_env: AppEnv,

    /// Allowed CORS origins (comma-separated)
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    pub bcrypt_cost: u32,
}

/// Refresh-cookie settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_ttl: Duration,
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_ttl: Duration::from_secs(7 * 24 * 3600),
            secure: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.access_token_secret.trim().is_empty() || self.refresh_token_secret.trim().is_empty()
        {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must not be empty");
        }
        if self.access_token_secret == self.refresh_token_secret {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            );
        }
        if self.store == StoreKind::Mongo && self.mongo_uri.is_none() {
            bail!("MONGO_URI is required when USER_STORE=mongo");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("Invalid HOST/PORT")
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            access_secret: self.access_token_secret.clone(),
            refresh_secret: self.refresh_token_secret.clone(),
            access_ttl: self.access_token_ttl,
            refresh_ttl: self.refresh_token_ttl,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            cookie_ttl: Duration::from_secs(u64::from(self.cookie_expire_days) * 24 * 3600),
            secure: self.app_env == AppEnv::Production,
        }
    }
}
