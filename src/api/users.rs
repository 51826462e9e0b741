//! User routes: registration, login, logout, session refresh and CRUD.

use crate::api::response::ApiResponse;
use crate::api::session::{clear_refresh_cookie, send_session, REFRESH_COOKIE};
use crate::api::AppState;
use crate::auth::middleware::ensure_self_or_admin;
use crate::auth::models::{AccessClaims, LoginRequest};
use crate::error::ApiError;
use crate::users::models::{ListQuery, UserResponse};
use crate::users::validation::{validate_new_user, validate_user_update};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserBody {
    #[serde(rename = "userData")]
    pub user_data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserBody {
    #[serde(rename = "updateData")]
    pub update_data: Option<Value>,
}

/// Raw listing parameters. Unparseable numbers fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "onlyActive")]
    pub only_active: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> ListQuery {
        let number = |raw: Option<String>| raw.and_then(|v| v.trim().parse::<u64>().ok());
        let only_active = self
            .only_active
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false);
        ListQuery::new(number(self.page), number(self.limit), only_active)
    }
}

fn parse_user_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId("_id"))
}

fn body_or_error<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

/// GET /worko/user/list
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse, ApiError> {
    let query = params.into_query();
    debug!(
        page = query.page,
        limit = query.limit,
        only_active = query.only_active,
        "Listing users"
    );

    let page = state.users.list_users(query).await?;
    let users: Vec<UserResponse> = page.users.iter().map(UserResponse::from_user).collect();

    Ok(ApiResponse::ok("Users")
        .with_data(json!({
            "users": users,
            "totalUsers": page.total_users,
            "currentPage": page.current_page,
        }))
        .notify())
}

/// GET /worko/user/:userId
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    let id = parse_user_id(&user_id)?;
    let user = state.users.get_user(&id).await?;

    Ok(ApiResponse::ok("User details fetched successfully")
        .with_data(json!({ "user": UserResponse::from_user(&user) })))
}

/// POST /worko/user/create
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse), ApiError> {
    let body = body_or_error(payload)?;
    let new_user = validate_new_user(body.user_data.as_ref())?;
    let user = state.users.create_user(new_user).await?;

    send_session(&state, jar, &user, "User created successfully")
}

/// PUT /worko/user/update/:userId
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(claims): Extension<AccessClaims>,
    payload: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Result<ApiResponse, ApiError> {
    let id = parse_user_id(&user_id)?;
    ensure_self_or_admin(&claims, &id)?;

    let body = body_or_error(payload)?;
    let update = validate_user_update(body.update_data.as_ref())?;
    let is_updated = state.users.update_user(&id, &update).await?;

    Ok(ApiResponse::ok("User updated successfully")
        .with_data(json!({ "isUpdated": is_updated }))
        .notify())
}

/// DELETE /worko/user/delete/:userId
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Extension(claims): Extension<AccessClaims>,
) -> Result<ApiResponse, ApiError> {
    let id = parse_user_id(&user_id)?;
    ensure_self_or_admin(&claims, &id)?;

    let is_deleted = state.users.delete_user(&id).await?;

    Ok(ApiResponse::ok("User deleted successfully")
        .with_data(json!({ "isDeleted": is_deleted }))
        .notify())
}

/// POST /worko/user/login
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiResponse), ApiError> {
    let body = body_or_error(payload)?;
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(email), Some(password)) = (non_empty(body.email), non_empty(body.password)) else {
        return Err(ApiError::MissingCredentials);
    };

    let user = state.users.login_user(&email, &password).await?;

    send_session(&state, jar, &user, "Logged in successfully.")
}

/// GET /worko/user/logout
pub async fn logout_user(jar: CookieJar) -> Result<(CookieJar, ApiResponse), ApiError> {
    if jar.get(REFRESH_COOKIE).is_none() {
        return Err(ApiError::MissingSession);
    }

    info!("User logged out");
    Ok((
        clear_refresh_cookie(jar),
        ApiResponse::ok("Logged out successfully.").notify(),
    ))
}

/// POST /worko/user/refresh
pub async fn refresh_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse), ApiError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::MissingToken)?;

    let claims = state.jwt.validate_refresh_token(&token).map_err(|e| {
        debug!("Rejected refresh token: {:#}", e);
        ApiError::InvalidToken
    })?;
    let id = ObjectId::parse_str(&claims.user_id).map_err(|_| ApiError::InvalidToken)?;
    let user = state.users.refresh_user(&id).await?;

    send_session(&state, jar, &user, "Token refreshed successfully.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>, only_active: Option<&str>) -> ListParams {
        ListParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            only_active: only_active.map(str::to_string),
        }
    }

    #[test]
    fn test_list_params_defaults_and_clamping() {
        let query = params(None, None, None).into_query();
        assert_eq!(query, ListQuery::default());

        let query = params(Some("3"), Some("500"), Some("true")).into_query();
        assert_eq!(query.page, 3);
        assert_eq!(query.limit, 100);
        assert!(query.only_active);

        let query = params(Some("abc"), Some("0"), Some("no")).into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(!query.only_active);
    }

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id("666950735891af0cbb45c8a4").is_ok());
        assert!(matches!(
            parse_user_id("not-an-id"),
            Err(ApiError::InvalidId("_id"))
        ));
    }
}
