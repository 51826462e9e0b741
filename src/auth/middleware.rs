//! Authentication Middleware
//! Mission: Protect routes with bearer-token validation and role checks

use crate::auth::{jwt::JwtHandler, models::AccessClaims};
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::debug;

/// Validates the `Authorization: Bearer` token and stores its claims in the
/// request extensions. The claims are copied onto the response so outer
/// layers can see who made the call.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::MissingToken)?;

    let claims = jwt_handler.validate_access_token(bearer.token()).map_err(|e| {
        debug!("Rejected access token: {:#}", e);
        ApiError::InvalidToken
    })?;

    req.extensions_mut().insert(claims.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(claims);
    Ok(response)
}

/// Rejects requests whose token does not carry the admin role. Must run
/// after [`auth_middleware`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = extract_claims(&req).ok_or(ApiError::MissingToken)?;
    if !claims.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&AccessClaims> {
    req.extensions().get::<AccessClaims>()
}

/// Non-admins may only act on their own account.
pub fn ensure_self_or_admin(claims: &AccessClaims, user_id: &ObjectId) -> Result<(), ApiError> {
    if claims.is_admin() || claims.user_id == user_id.to_hex() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
