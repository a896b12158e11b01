//! Password reset endpoints
//!
//! Three-step flow: request a code by email, validate the code, then set
//! the new password. The request endpoint wraps its payload in the
//! backend's `{data, message, success}` envelope; the other two return
//! their payloads directly.

use super::client::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Envelope used by the password-reset request endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
    #[serde(default)]
    #[allow(dead_code)]
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestResetResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResetCodeResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// Body for `POST /password-reset/reset`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

impl ApiClient {
    /// Request a reset code to be mailed to the given address.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<RequestResetResponse, ApiError> {
        let envelope: ApiEnvelope<RequestResetResponse> = self
            .post_json("/password-reset/request", &json!({ "email": email }))
            .await?;
        Ok(envelope.data)
    }

    /// Check a reset code. `valid: false` is a successful response, not an
    /// error; the caller surfaces the message inline.
    pub async fn validate_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<ValidateResetCodeResponse, ApiError> {
        self.post_json(
            "/password-reset/validate",
            &json!({ "email": email, "code": code }),
        )
        .await
    }

    /// Set a new password using a validated reset code.
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ResetPasswordResponse, ApiError> {
        self.post_json("/password-reset/reset", request).await
    }
}
