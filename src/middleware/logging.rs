//! Request logging middleware.
//!
//! Logs every HTTP request with method, path, status code, latency and, for
//! authenticated routes, the caller's user id.

use crate::api::HEALTH_PATH;
use crate::auth::models::AccessClaims;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs at INFO level for completed requests, WARN level for 5xx.
/// The health check is not logged.
pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == HEALTH_PATH {
        return next.run(request).await;
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    // Set by the auth middleware on protected routes
    let user_id = caller_id(&response).unwrap_or("-");

    if status >= 500 {
        warn!(
            method = %method,
            path = %path,
            status,
            latency_ms,
            user_id,
            "Request failed (5xx)"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status,
            latency_ms,
            user_id,
            "Request completed"
        );
    }

    response
}

fn caller_id(response: &Response) -> Option<&str> {
    response
        .extensions()
        .get::<AccessClaims>()
        .map(|claims| claims.user_id.as_str())
}
