//! OAuth bridge - adapts platform identity flows into backend sessions
//!
//! The platform SDKs (Google, Apple) live outside this crate; they are
//! represented by the [`IdentityProvider`] trait and only hand over the
//! identity token they produced. The bridge exchanges that token with the
//! backend and completes the same persist-then-transition sequence as a
//! password sign-in.

use super::session::SessionManager;
use super::types::AuthProvider;
use crate::api::ApiClient;
use crate::config::ApiConfig;
use log::{error, info, warn};
use std::sync::Arc;

/// Result of the platform-native identity flow.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityFlow {
    /// The user completed the flow; `id_token` is the provider's opaque
    /// identity token.
    Granted { id_token: String },
    /// The user backed out. Not an error.
    Cancelled,
    /// The flow failed (SDK error, platform unavailability).
    Failed(String),
}

/// Platform identity SDK seam. Implemented by the host application per
/// provider.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Which backend exchange this provider maps to.
    fn kind(&self) -> AuthProvider;

    /// Whether this provider can run on the current device/configuration.
    /// Gates whether the corresponding UI entry point is shown.
    fn is_available(&self) -> bool;

    /// Run the platform-native sign-in flow.
    async fn acquire_identity_token(&self) -> IdentityFlow;
}

/// Outcome surfaced to the calling screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    Success,
    /// User-initiated cancellation; nothing is surfaced to the user.
    Cancelled,
    /// Failure message for a notification.
    Failed(String),
}

impl SignInOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SignInOutcome::Success)
    }
}

/// Bridges third-party identity flows into backend token exchange and the
/// session manager's atomic sign-in.
pub struct OAuthBridge {
    client: Arc<ApiClient>,
    session: Arc<SessionManager>,
}

impl OAuthBridge {
    pub fn new(client: Arc<ApiClient>, session: Arc<SessionManager>) -> Self {
        Self { client, session }
    }

    /// Run the full flow for one provider: native sign-in, backend token
    /// exchange, then persist-and-transition through the session manager.
    pub async fn sign_in<P: IdentityProvider>(&self, provider: &P) -> SignInOutcome {
        let kind = provider.kind();

        if !provider.is_available() {
            return SignInOutcome::Failed(format!(
                "{} sign-in is not available on this device",
                kind.label()
            ));
        }

        info!("Starting {} sign-in", kind.label());
        let flow = self.session.begin_flow();

        let id_token = match provider.acquire_identity_token().await {
            IdentityFlow::Granted { id_token } if !id_token.is_empty() => id_token,
            IdentityFlow::Granted { .. } => {
                return SignInOutcome::Failed(format!(
                    "No identity token received from {}",
                    kind.label()
                ));
            }
            IdentityFlow::Cancelled => {
                info!("{} sign-in cancelled by user", kind.label());
                return SignInOutcome::Cancelled;
            }
            IdentityFlow::Failed(message) => {
                error!("{} identity flow failed: {}", kind.label(), message);
                return SignInOutcome::Failed(message);
            }
        };

        let exchange = match kind {
            AuthProvider::Google => self.client.google_sign_in(&id_token).await,
            AuthProvider::Apple => self.client.apple_sign_in(&id_token).await,
            AuthProvider::Email => {
                return SignInOutcome::Failed(
                    "Email sign-in does not go through the OAuth bridge".to_string(),
                );
            }
        };

        let response = match exchange {
            Ok(response) => response,
            Err(e) => {
                error!("{} token exchange failed: {}", kind.label(), e);
                return SignInOutcome::Failed(e.to_string());
            }
        };

        match self.session.complete_sign_in(&flow, response).await {
            Ok(true) => {
                info!("{} sign-in successful", kind.label());
                SignInOutcome::Success
            }
            Ok(false) => {
                // Screen went away mid-flow; treated like a cancellation.
                warn!("{} sign-in completed after its flow went stale", kind.label());
                SignInOutcome::Cancelled
            }
            Err(e) => SignInOutcome::Failed(e.to_string()),
        }
    }
}

/// Apple sign-in requires an Apple platform.
pub fn is_apple_sign_in_available() -> bool {
    cfg!(any(target_os = "ios", target_os = "macos"))
}

/// Google sign-in requires a configured web client id.
pub fn is_google_sign_in_available(config: &ApiConfig) -> bool {
    config.google_web_client_id.is_some()
}
