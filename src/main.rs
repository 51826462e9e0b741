//! Worko - user management API
//! Mission: Register, authenticate and manage user accounts over MongoDB

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worko_backend::{
    api::{self, AppState},
    auth::JwtHandler,
    config::{AppConfig, StoreKind},
    middleware::request_logging,
    users::{MemoryUserStore, MongoUserStore, UserService, UserStore},
};

const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = AppConfig::parse();
    config.validate()?;

    info!(env = ?config.app_env, store = ?config.store, "Worko backend starting");

    let store: Arc<dyn UserStore> = match config.store {
        StoreKind::Mongo => {
            let uri = config
                .mongo_uri
                .as_deref()
                .context("MONGO_URI is required when USER_STORE=mongo")?;
            Arc::new(MongoUserStore::connect(uri, &config.mongo_db).await?)
        }
        StoreKind::Memory => {
            warn!("Using in-memory user store; data is lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let state = AppState {
        users: Arc::new(UserService::new(store, config.bcrypt_cost)),
        jwt: Arc::new(JwtHandler::new(&config.jwt_config())),
        session: config.session_config(),
    };

    let app = api::router(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&config.cors_origins)?);

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Credentialed CORS for the configured origins; the refresh cookie needs
/// `allow_credentials`.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {}", o))
        })
        .collect::<Result<Vec<_>>>()?;

    if origins.is_empty() {
        warn!("CORS_ORIGINS is empty; cross-origin requests will be rejected");
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worko_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env when started from elsewhere
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
