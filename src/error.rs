//! API errors and their JSON rendering.
//!
//! Every failure a client can observe goes through [`ApiError`], which renders
//! the `{ success: false, message, notify }` envelope with the matching status.

use crate::users::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthenticated user")]
    MissingToken,
    #[error("Unauthenticated user.")]
    InvalidToken,
    #[error("User does not have correct access rights")]
    Forbidden,
    #[error("Please enter a valid email and password")]
    MissingCredentials,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidPayload(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error("Resource not found. Invalid : {0}")]
    InvalidId(&'static str),
    #[error("Invalid user id or user not found")]
    UserNotFound,
    #[error("Invalid user id. User not found")]
    UpdateTargetNotFound,
    #[error("Duplicate {0} entered")]
    Duplicate(String),
    #[error("Something went wrong while logging out")]
    MissingSession,
    #[error("Route not found")]
    RouteNotFound,
    #[error("Internal Server Error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken
            | ApiError::InvalidToken
            | ApiError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InvalidCredentials
            | ApiError::Validation(_)
            | ApiError::MalformedBody(_)
            | ApiError::InvalidId(_)
            | ApiError::Duplicate(_)
            | ApiError::MissingSession => StatusCode::BAD_REQUEST,
            ApiError::InvalidPayload(_)
            | ApiError::UserNotFound
            | ApiError::UpdateTargetNotFound
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the client should surface the message to the end user.
    pub fn notify(&self) -> bool {
        !matches!(
            self,
            ApiError::InvalidToken
                | ApiError::InvalidId(_)
                | ApiError::Duplicate(_)
                | ApiError::MissingSession
                | ApiError::RouteNotFound
                | ApiError::Internal(_)
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => ApiError::Duplicate(field),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            error!(error = ?source, "Request failed with internal error");
        }

        let body = json!({
            "success": false,
            "message": self.to_string(),
            "notify": self.notify(),
        });

        (self.status(), Json(body)).into_response()
    }
}
