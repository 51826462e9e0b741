//! Authentication Models
//! Mission: Define roles and the JWT payloads carried by access and refresh tokens

use serde::{Deserialize, Serialize};

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin, // Can list every account and manage other users
    #[serde(rename = "user")]
    #[default]
    User, // Can read accounts and manage its own
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

/// How an account was registered
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthProvider {
    #[serde(rename = "local")]
    #[default]
    Local,
    #[serde(rename = "google_sso")]
    GoogleSso,
}

/// Access token payload
///
/// `role` is only written for admins, so a plain user's token carries no role
/// claim at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub iat: usize,
    pub exp: usize, // expiration timestamp
}

impl AccessClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

/// Refresh token payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Login request body
///
/// Both fields are optional so a missing credential is reported with the
/// login-specific message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let admin = UserRole::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let user: UserRole = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(user, UserRole::User);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::User.as_str(), "user");
    }

    #[test]
    fn test_access_claims_omit_role_for_plain_users() {
        let claims = AccessClaims {
            user_id: "666950735891af0cbb45c8a4".to_string(),
            email: "test@test.com".to_string(),
            role: None,
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("role").is_none());
        assert_eq!(json["userId"], "666950735891af0cbb45c8a4");
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_provider_serialization() {
        assert_eq!(
            serde_json::to_string(&AuthProvider::GoogleSso).unwrap(),
            r#""google_sso""#
        );
        assert_eq!(AuthProvider::default(), AuthProvider::Local);
    }
}
