//! HTTP surface: shared state and the `/worko` router.

pub mod response;
pub mod session;
pub mod users;

use crate::auth::{auth_middleware, require_admin, JwtHandler};
use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::users::UserService;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use response::ApiResponse;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub jwt: Arc<JwtHandler>,
    pub session: SessionConfig,
}

pub const API_PREFIX: &str = "/worko";
pub const HEALTH_PATH: &str = "/worko/check";

/// Build the full application router. Layers that depend on deployment
/// (CORS, body limit, request logging) are added by the binary.
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/user/list", get(users::list_users))
        .route_layer(middleware::from_fn(require_admin));

    let protected_routes = Router::new()
        .route("/user/:user_id", get(users::get_user))
        .route("/user/update/:user_id", put(users::update_user))
        .route("/user/delete/:user_id", delete(users::delete_user))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/check", get(health_check))
        .route("/user/create", post(users::create_user))
        .route("/user/login", post(users::login_user))
        .route("/user/logout", get(users::logout_user))
        .route("/user/refresh", post(users::refresh_session));

    let api = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state);

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(route_not_found)
}

async fn health_check() -> ApiResponse {
    ApiResponse::ok("Server is working")
        .with_data(json!({ "data": "Check server value...." }))
        .notify()
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
