//! Session issuance: access token in the body, refresh token in a cookie.

use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::users::models::{User, UserResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;

pub const REFRESH_COOKIE: &str = "refresh_token";

/// Issue both tokens for `user`, set the refresh cookie and answer with the
/// sanitized user plus the access token.
pub fn send_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
    message: &'static str,
) -> Result<(CookieJar, ApiResponse), ApiError> {
    let access_token = state.jwt.generate_access_token(user)?;
    let refresh_token = state.jwt.generate_refresh_token(user)?;

    let jar = jar.add(refresh_cookie(refresh_token, &state.session));
    let body = ApiResponse::ok(message)
        .with_data(json!({
            "user": UserResponse::from_user(user),
            "accessToken": access_token,
        }))
        .notify();

    Ok((jar, body))
}

pub fn refresh_cookie(token: String, session: &SessionConfig) -> Cookie<'static> {
    let max_age = i64::try_from(session.cookie_ttl.as_secs()).unwrap_or(i64::MAX);
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .secure(session.secure)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Drop the refresh cookie. Path must match the one it was set with.
pub fn clear_refresh_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_refresh_cookie_attributes() {
        let session = SessionConfig {
            cookie_ttl: Duration::from_secs(2 * 24 * 3600),
            secure: true,
        };
        let cookie = refresh_cookie("token".to_string(), &session);

        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(2 * 24 * 3600)));
    }

    #[test]
    fn test_clear_refresh_cookie() {
        let jar = CookieJar::new().add(refresh_cookie(
            "token".to_string(),
            &SessionConfig::default(),
        ));
        assert!(jar.get(REFRESH_COOKIE).is_some());

        let jar = clear_refresh_cookie(jar);
        assert!(jar.get(REFRESH_COOKIE).is_none());
    }
}
