//! HTTP client for the StyleSync backend
//!
//! All outbound requests go through here: the access token is read from
//! secure storage on demand and attached as a bearer credential when
//! present, and failures are decoded once into a typed [`ApiError`].

use crate::auth::SecureStorage;
use crate::config::ApiConfig;
use log::{debug, error, info, warn};
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("StyleSync/", env!("CARGO_PKG_VERSION"));

/// Default retry count for idempotent reads. Mutations are never retried.
const GET_RETRIES: u32 = 2;

/// Typed failure decoded at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access forbidden: {0}")]
    Forbidden(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request failed ({status}): {message}")]
    Request {
        status: u16,
        message: String,
        /// Per-field validation errors from the backend, when present.
        field_errors: HashMap<String, String>,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Field-level errors for inline display, when the backend sent any.
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Request { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed (transport and 5xx only).
    fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }
}

/// Error body shape returned by the backend. Both fields are optional;
/// anything unparseable falls back to a status-derived message.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: HashMap<String, String>,
}

/// Classify a non-success response by status family, decoding the error
/// body exactly once.
fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed.message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    match status.as_u16() {
        401 => ApiError::Unauthorized(message),
        403 => ApiError::Forbidden(message),
        s if s >= 500 => ApiError::Server { status: s, message },
        s => ApiError::Request {
            status: s,
            message,
            field_errors: parsed.errors,
        },
    }
}

/// HTTP client wrapping all backend calls.
pub struct ApiClient {
    http: Client,
    base_url: String,
    storage: Arc<SecureStorage>,
}

impl ApiClient {
    /// Create a new ApiClient
    pub fn new(config: &ApiConfig, storage: Arc<SecureStorage>) -> Self {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.base_url.clone(),
            storage,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token when one is stored. Absence of a token
    /// produces an unauthenticated request, not an error.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.get_access_token() {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<T, ApiError> {
        debug!("API request: {} {}", method, path);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            match &err {
                ApiError::Unauthorized(_) => warn!("Unauthorized: {} {}", method, path),
                ApiError::Forbidden(_) => warn!("Access forbidden: {} {}", method, path),
                ApiError::Server { status, .. } => {
                    error!("Server error {} for {} {}", status, method, path)
                }
                _ => error!("{} {} failed: {} - {}", method, path, status, body),
            }
            return Err(err);
        }

        debug!("API response: {} {} {}", status.as_u16(), method, path);
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET with the client's default retry count for idempotent reads.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            let request = self.authorize(self.http.get(self.url(path)));
            match self.execute(request, "GET", path).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < GET_RETRIES => {
                    let delay = Duration::from_millis(250 * (1 << attempt));
                    warn!("GET {} failed ({}), retrying in {:?}", path, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// POST a JSON body. Never retried.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authorize(self.http.post(self.url(path)).json(body));
        self.execute(request, "POST", path).await
    }

    /// POST a multipart form (image uploads). Never retried.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let request = self.authorize(self.http.post(self.url(path)).multipart(form));
        self.execute(request, "POST", path).await
    }

    /// DELETE with no response body expected.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!("API request: DELETE {}", path);

        let request = self.authorize(self.http.delete(self.url(path)));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &body);
            error!("DELETE {} failed: {} - {}", path, status, body);
            return Err(err);
        }

        info!("Deleted {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_failure(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Token expired"}"#,
        );
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Token expired"));
    }

    #[test]
    fn test_classify_forbidden() {
        let err = classify_failure(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, ApiError::Forbidden(ref m) if m == "Forbidden"));
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Server, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_decodes_field_errors_once() {
        let body = r#"{
            "message": "Validation failed",
            "errors": {"email": "Email already in use", "password": "Too weak"}
        }"#;
        let err = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, body);

        let fields = err.field_errors().expect("field errors present");
        assert_eq!(fields.get("email").unwrap(), "Email already in use");
        assert_eq!(fields.get("password").unwrap(), "Too weak");
        assert_eq!(
            err.to_string(),
            "Request failed (422): Validation failed"
        );
    }

    #[test]
    fn test_classify_unparseable_body_uses_status_reason() {
        let err = classify_failure(StatusCode::BAD_REQUEST, "<html>nope</html>");
        match err {
            ApiError::Request {
                status,
                message,
                field_errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request");
                assert!(field_errors.is_empty());
            }
            other => panic!("expected Request, got {:?}", other),
        }
    }

    #[test]
    fn test_retryable_classes() {
        assert!(ApiError::Network("timeout".to_string()).is_retryable());
        assert!(ApiError::Server {
            status: 500,
            message: "boom".to_string()
        }
        .is_retryable());
        assert!(!ApiError::Unauthorized("no".to_string()).is_retryable());
        assert!(!ApiError::Request {
            status: 404,
            message: "missing".to_string(),
            field_errors: HashMap::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_field_errors_absent_for_empty_map() {
        let err = ApiError::Request {
            status: 400,
            message: "Bad request".to_string(),
            field_errors: HashMap::new(),
        };
        assert!(err.field_errors().is_none());
    }
}
