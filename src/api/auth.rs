//! Authentication endpoints
//!
//! Sign-in, sign-up, and OAuth token exchange all return the same
//! [`AuthResponse`] shape; the current-user endpoint returns the bare
//! profile.

use super::client::{ApiClient, ApiError};
use crate::auth::types::{AuthProvider, AuthResponse, User};
use serde::Serialize;
use serde_json::json;

/// Body for `POST /auth/signin`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl LoginRequest {
    /// Plain email/password sign-in.
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            provider: Some(AuthProvider::Email),
            id_token: None,
        }
    }
}

/// Body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,
}

impl ApiClient {
    /// Sign in with credentials. The provider defaults to email/password
    /// when the caller leaves it unset.
    pub async fn sign_in(&self, mut request: LoginRequest) -> Result<AuthResponse, ApiError> {
        if request.provider.is_none() {
            request.provider = Some(AuthProvider::Email);
        }
        self.post_json("/auth/signin", &request).await
    }

    /// Create a new account.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/signup", request).await
    }

    /// Fetch the currently authenticated user's profile.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me").await
    }

    /// Exchange a Google identity token for backend session tokens.
    pub async fn google_sign_in(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/google", &json!({ "idToken": id_token }))
            .await
    }

    /// Exchange an Apple identity token for backend session tokens.
    pub async fn apple_sign_in(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        self.post_json("/auth/apple", &json!({ "idToken": id_token }))
            .await
    }
}
