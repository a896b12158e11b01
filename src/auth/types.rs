//! Authentication types

use crate::api::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity provider that issued the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Email,
    Google,
    Apple,
}

impl AuthProvider {
    pub fn label(&self) -> &'static str {
        match self {
            AuthProvider::Email => "Email",
            AuthProvider::Google => "Google",
            AuthProvider::Apple => "Apple",
        }
    }
}

/// User profile as returned by the backend.
///
/// Replaced wholesale on each sign-in/sign-up response; individual fields
/// are never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub provider: AuthProvider,
    #[serde(default)]
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name from first/last name, falling back to the email prefix.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }

    /// Initials for avatar display (max 2 characters).
    pub fn initials(&self) -> String {
        let first = self.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let last = self.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let initials: String = match (first, last) {
            (Some(f), Some(l)) => f.chars().take(1).chain(l.chars().take(1)).collect(),
            (Some(f), None) => f.chars().take(1).collect(),
            (None, Some(l)) => l.chars().take(1).collect(),
            (None, None) => self.email.chars().take(1).collect(),
        };
        initials.to_uppercase()
    }
}

/// Access/refresh credential pair issued on successful authentication.
///
/// Opaque strings; never held in the in-memory session. The HTTP client
/// reads the access token from storage on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response shape shared by password sign-in, sign-up, and OAuth exchange.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl AuthResponse {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Error types for the auth subsystem
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: "user-1".to_string(),
            email: "casey@example.com".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            profile_image: None,
            provider: AuthProvider::Email,
            provider_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_deserialize_camel_case() {
        let json = r#"{
            "id": "u-42",
            "email": "casey@example.com",
            "firstName": "Casey",
            "lastName": "Lim",
            "profileImage": null,
            "provider": "GOOGLE",
            "providerId": "google-oauth2|12345",
            "createdAt": "2026-01-05T12:00:00.000Z",
            "updatedAt": "2026-01-06T12:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u-42");
        assert_eq!(user.first_name.as_deref(), Some("Casey"));
        assert_eq!(user.provider, AuthProvider::Google);
        assert_eq!(user.provider_id.as_deref(), Some("google-oauth2|12345"));
    }

    #[test]
    fn test_auth_response_deserialize() {
        let json = r#"{
            "accessToken": "access-abc",
            "refreshToken": "refresh-def",
            "user": {
                "id": "u-1",
                "email": "casey@example.com",
                "provider": "EMAIL",
                "createdAt": "2026-01-05T12:00:00.000Z",
                "updatedAt": "2026-01-05T12:00:00.000Z"
            }
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "access-abc");
        assert_eq!(response.refresh_token, "refresh-def");
        assert_eq!(response.user.email, "casey@example.com");

        let pair = response.token_pair();
        assert_eq!(pair.access_token, "access-abc");
        assert_eq!(pair.refresh_token, "refresh-def");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(
            make_user(Some("Casey"), Some("Lim")).display_name(),
            "Casey Lim"
        );
        assert_eq!(make_user(Some("Casey"), None).display_name(), "Casey");
        assert_eq!(make_user(None, Some("Lim")).display_name(), "Lim");
        // Falls back to the email prefix when no name is set
        assert_eq!(make_user(None, None).display_name(), "casey");
    }

    #[test]
    fn test_initials() {
        assert_eq!(make_user(Some("Casey"), Some("Lim")).initials(), "CL");
        assert_eq!(make_user(Some("casey"), None).initials(), "C");
        assert_eq!(make_user(None, None).initials(), "C");
    }

    #[test]
    fn test_provider_wire_values() {
        assert_eq!(
            serde_json::to_string(&AuthProvider::Email).unwrap(),
            "\"EMAIL\""
        );
        assert_eq!(
            serde_json::to_string(&AuthProvider::Apple).unwrap(),
            "\"APPLE\""
        );
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::NotAuthenticated.to_string(), "Not authenticated");
        assert_eq!(
            AuthError::Storage("keyring unavailable".to_string()).to_string(),
            "Storage error: keyring unavailable"
        );
    }
}
