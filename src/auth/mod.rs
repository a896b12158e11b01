//! Authentication module for StyleSync
//!
//! Handles the session lifecycle:
//! - email/password and OAuth sign-in completion
//! - secure token and profile storage
//! - app-start session rehydration
//! - stale-flow invalidation

pub mod oauth;
mod session;
mod storage;
pub mod types;

pub use oauth::{IdentityFlow, IdentityProvider, OAuthBridge, SignInOutcome};
pub use session::{FlowGuard, Session, SessionManager};
pub use storage::SecureStorage;
pub use types::*;
