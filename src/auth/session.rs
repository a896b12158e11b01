//! Session manager - owns the in-memory authentication state
//!
//! A single owned instance is injected into the presentation layer; the
//! session is only ever mutated through the operations here. Persisting
//! tokens and marking the session authenticated is one atomic operation
//! (`complete_sign_in`), so callers cannot observe "authenticated" while
//! the token store is still empty.

use super::storage::SecureStorage;
use super::types::{AuthError, AuthResponse, User};
use log::{error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory session snapshot read by navigation and screens.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Session {
    /// Process-start state: loading, not authenticated.
    fn initial() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    fn authenticated(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    fn anonymous() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }
}

/// Handle tying an in-flight sign-in to the session generation that
/// started it. A completion carrying a stale guard is dropped instead of
/// applied, so results arriving after the initiating screen is gone (or
/// after a logout) cannot resurrect a session.
#[derive(Debug, Clone, Copy)]
pub struct FlowGuard {
    generation: u64,
}

/// Owns session state and the secure token store.
pub struct SessionManager {
    state: Mutex<Session>,
    storage: Arc<SecureStorage>,
    generation: AtomicU64,
}

impl SessionManager {
    /// Create a new SessionManager in the loading state.
    pub fn new(storage: Arc<SecureStorage>) -> Self {
        Self {
            state: Mutex::new(Session::initial()),
            storage,
            generation: AtomicU64::new(0),
        }
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Session {
        self.state.lock().unwrap().clone()
    }

    /// Whether a user is currently authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().is_authenticated
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<User> {
        self.state.lock().unwrap().user.clone()
    }

    /// Direct loading-flag override for UI-driven indicators. Does not
    /// touch `user` or `is_authenticated`.
    pub fn set_loading(&self, loading: bool) {
        self.state.lock().unwrap().is_loading = loading;
    }

    /// Start a sign-in flow tied to the current generation.
    pub fn begin_flow(&self) -> FlowGuard {
        FlowGuard {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Invalidate all in-flight flows (screen unmounted, user navigated
    /// away). Their results will be dropped on arrival.
    pub fn invalidate_flows(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn flow_is_current(&self, flow: &FlowGuard) -> bool {
        self.generation.load(Ordering::SeqCst) == flow.generation
    }

    /// Rehydrate the session from secure storage at app start.
    ///
    /// Token presence and the cached user are read concurrently; both
    /// reads complete before the transition. Both present yields an
    /// authenticated session, anything else (including storage failures)
    /// falls open to anonymous - never to an error.
    pub async fn initialize(&self) {
        info!("Initializing session from secure storage");
        self.set_loading(true);

        let storage_a = self.storage.clone();
        let storage_b = self.storage.clone();
        let authenticated_task =
            tokio::task::spawn_blocking(move || storage_a.is_authenticated());
        let user_task = tokio::task::spawn_blocking(move || storage_b.get_user_data());

        let (authenticated, user) = tokio::join!(authenticated_task, user_task);
        let authenticated = authenticated.unwrap_or_else(|e| {
            error!("Token presence check failed: {}", e);
            false
        });
        let user = user.unwrap_or_else(|e| {
            error!("Cached user read failed: {}", e);
            None
        });

        let mut state = self.state.lock().unwrap();
        match user {
            Some(user) if authenticated => {
                info!("Restored session for {}", user.email);
                *state = Session::authenticated(user);
            }
            _ => {
                info!("No stored session, starting anonymous");
                *state = Session::anonymous();
            }
        }
    }

    /// Persist tokens and the user snapshot, then mark the session
    /// authenticated - in that order, as one operation.
    ///
    /// Returns `Ok(true)` when the transition was applied, `Ok(false)`
    /// when the flow was stale and the result dropped.
    pub async fn complete_sign_in(
        &self,
        flow: &FlowGuard,
        response: AuthResponse,
    ) -> Result<bool, AuthError> {
        if !self.flow_is_current(flow) {
            warn!("Dropping sign-in result from a stale flow");
            return Ok(false);
        }

        let tokens = response.token_pair();
        let user = response.user;

        let storage = self.storage.clone();
        let persisted_user = user.clone();
        tokio::task::spawn_blocking(move || {
            storage.set_tokens(&tokens.access_token, &tokens.refresh_token)?;
            storage.set_user_data(&persisted_user)
        })
        .await
        .map_err(|e| AuthError::Storage(format!("Storage task failed: {}", e)))??;

        // The flow may have been invalidated while we were persisting; a
        // stale completion must not leave credentials behind either.
        if !self.flow_is_current(flow) {
            warn!("Sign-in flow went stale during persistence, rolling back");
            let storage = self.storage.clone();
            let _ = tokio::task::spawn_blocking(move || storage.clear_tokens()).await;
            return Ok(false);
        }

        info!("Signed in as {}", user.email);
        *self.state.lock().unwrap() = Session::authenticated(user);
        Ok(true)
    }

    /// Clear stored credentials and drop to anonymous.
    ///
    /// The transition is unconditional: even when the clear fails, the
    /// in-memory session ends anonymous. The storage error is still
    /// returned so the caller can surface it.
    pub async fn logout(&self) -> Result<(), AuthError> {
        info!("Logging out");
        self.invalidate_flows();

        let storage = self.storage.clone();
        let result = match tokio::task::spawn_blocking(move || storage.clear_tokens()).await {
            Ok(result) => result,
            Err(e) => Err(AuthError::Storage(format!("Storage task failed: {}", e))),
        };

        *self.state.lock().unwrap() = Session::anonymous();

        if let Err(e) = &result {
            warn!("Failed to clear stored credentials on logout: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::AuthProvider;
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_manager() -> (TempDir, Arc<SecureStorage>, SessionManager) {
        let dir = TempDir::new().unwrap();
        let storage =
            Arc::new(SecureStorage::with_data_dir(dir.path().to_path_buf()).unwrap());
        let manager = SessionManager::new(storage.clone());
        (dir, storage, manager)
    }

    fn make_user(email: &str) -> User {
        User {
            id: "user-1".to_string(),
            email: email.to_string(),
            first_name: Some("Casey".to_string()),
            last_name: Some("Lim".to_string()),
            profile_image: None,
            provider: AuthProvider::Email,
            provider_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_response(email: &str) -> AuthResponse {
        AuthResponse {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-def".to_string(),
            user: make_user(email),
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let (_dir, _storage, manager) = make_manager();
        let session = manager.snapshot();
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_initialize_with_empty_store_is_anonymous() {
        let (_dir, _storage, manager) = make_manager();

        manager.initialize().await;

        let session = manager.snapshot();
        assert!(!session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_initialize_restores_stored_session() {
        let (_dir, storage, manager) = make_manager();
        let user = make_user("casey@example.com");
        storage.set_tokens("access", "refresh").unwrap();
        storage.set_user_data(&user).unwrap();

        manager.initialize().await;

        let session = manager.snapshot();
        assert!(session.is_authenticated);
        assert_eq!(session.user, Some(user));
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_initialize_requires_both_token_and_user() {
        let (_dir, storage, manager) = make_manager();
        storage.set_tokens("access", "refresh").unwrap();
        // No cached user snapshot

        manager.initialize().await;

        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_complete_sign_in_persists_then_transitions() {
        let (_dir, storage, manager) = make_manager();

        let flow = manager.begin_flow();
        let applied = manager
            .complete_sign_in(&flow, make_response("casey@example.com"))
            .await
            .unwrap();

        assert!(applied);
        // Session reports authenticated AND the store holds the credentials
        assert!(manager.is_authenticated());
        assert_eq!(storage.get_access_token().as_deref(), Some("access-abc"));
        assert_eq!(storage.get_refresh_token().as_deref(), Some("refresh-def"));
        assert_eq!(
            storage.get_user_data().unwrap().email,
            "casey@example.com"
        );
    }

    #[tokio::test]
    async fn test_stale_flow_is_dropped() {
        let (_dir, storage, manager) = make_manager();

        let flow = manager.begin_flow();
        manager.invalidate_flows();

        let applied = manager
            .complete_sign_in(&flow, make_response("casey@example.com"))
            .await
            .unwrap();

        assert!(!applied);
        assert!(!manager.is_authenticated());
        assert!(storage.get_access_token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_storage_and_session() {
        let (_dir, storage, manager) = make_manager();

        let flow = manager.begin_flow();
        manager
            .complete_sign_in(&flow, make_response("casey@example.com"))
            .await
            .unwrap();

        manager.logout().await.unwrap();

        let session = manager.snapshot();
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(storage.get_access_token().is_none());
        assert!(storage.get_refresh_token().is_none());
        assert!(storage.get_user_data().is_none());
    }

    #[tokio::test]
    async fn test_logout_from_anonymous_is_fine() {
        let (_dir, _storage, manager) = make_manager();
        manager.initialize().await;
        manager.logout().await.unwrap();
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_invalidates_in_flight_flows() {
        let (_dir, storage, manager) = make_manager();

        let flow = manager.begin_flow();
        manager.logout().await.unwrap();

        let applied = manager
            .complete_sign_in(&flow, make_response("casey@example.com"))
            .await
            .unwrap();
        assert!(!applied);
        assert!(storage.get_access_token().is_none());
    }

    #[test]
    fn test_set_loading_only_touches_the_flag() {
        let (_dir, _storage, manager) = make_manager();

        manager.set_loading(false);
        assert!(!manager.snapshot().is_loading);

        manager.set_loading(true);
        let session = manager.snapshot();
        assert!(session.is_loading);
        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
    }
}
