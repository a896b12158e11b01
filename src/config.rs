//! API configuration
//!
//! Base URL and request timeout come from the environment, with a
//! hard-coded local fallback for development builds.

use log::warn;
use std::time::Duration;

const BASE_URL_VAR: &str = "STYLESYNC_API_BASE_URL";
const TIMEOUT_VAR: &str = "STYLESYNC_API_TIMEOUT_MS";
const GOOGLE_CLIENT_ID_VAR: &str = "STYLESYNC_GOOGLE_WEB_CLIENT_ID";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the HTTP client and OAuth availability checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Google OAuth web client id; Google sign-in is gated on its presence.
    pub google_web_client_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            google_web_client_id: None,
        }
    }
}

impl ApiConfig {
    /// Build the configuration from environment variables, falling back to
    /// the local development defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = parse_timeout_ms(lookup(TIMEOUT_VAR));

        let google_web_client_id = lookup(GOOGLE_CLIENT_ID_VAR).filter(|v| !v.trim().is_empty());

        Self {
            base_url,
            timeout,
            google_web_client_id,
        }
    }
}

fn parse_timeout_ms(raw: Option<String>) -> Duration {
    match raw {
        Some(value) => match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => {
                warn!(
                    "Invalid {} value {:?}, using default {}ms",
                    TIMEOUT_VAR, value, DEFAULT_TIMEOUT_MS
                );
                Duration::from_millis(DEFAULT_TIMEOUT_MS)
            }
        },
        None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert!(config.google_web_client_id.is_none());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = ApiConfig::from_lookup(|key| match key {
            BASE_URL_VAR => Some("https://api.stylesync.app/".to_string()),
            TIMEOUT_VAR => Some("30000".to_string()),
            GOOGLE_CLIENT_ID_VAR => Some("web-client-id".to_string()),
            _ => None,
        });
        // Trailing slash is stripped so path joins stay predictable
        assert_eq!(config.base_url, "https://api.stylesync.app");
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.google_web_client_id.as_deref(), Some("web-client-id"));
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        assert_eq!(
            parse_timeout_ms(Some("not-a-number".to_string())),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            parse_timeout_ms(Some("0".to_string())),
            Duration::from_millis(10_000)
        );
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = ApiConfig::from_lookup(|key| match key {
            BASE_URL_VAR => Some("   ".to_string()),
            GOOGLE_CLIENT_ID_VAR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.google_web_client_id.is_none());
    }
}
