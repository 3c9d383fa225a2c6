//! Observable session state.
//!
//! One shared snapshot struct mutated by a fixed set of transitions, plus a
//! broadcast event stream for consumers that react to lifecycle changes
//! rather than polling.

use std::sync::{Arc, RwLock};

use portico_auth::UserProfile;

/// Snapshot of the session at a point in time.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub is_authenticated: bool,
    /// True while startup restoration or a login/register call is in flight.
    pub is_loading: bool,
    /// Message of the most recent auth failure; cleared by the next attempt.
    pub error: Option<String>,
}

/// Session lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login completed and the session is authenticated.
    Authenticated,
    /// The token pair was rotated.
    TokensRefreshed,
    /// The user signed out.
    LoggedOut,
    /// A refresh failed terminally; credentials were cleared and the user
    /// must sign in again.
    SessionExpired,
}

/// Shared, cloneable handle to the session state.
#[derive(Debug, Clone)]
pub struct SharedSessionState {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedSessionState {
    /// Fresh state: unauthenticated, loading until `initialize` completes.
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState {
                is_loading: true,
                ..SessionState::default()
            })),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.read().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().unwrap().is_loading
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.inner.read().unwrap().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.read().unwrap().access_token.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().unwrap().error.clone()
    }

    /// An auth attempt started: show progress, drop any stale error.
    pub(crate) fn begin_auth(&self) {
        let mut state = self.inner.write().unwrap();
        state.is_loading = true;
        state.error = None;
    }

    pub(crate) fn auth_success(&self, user: UserProfile, access_token: String, refresh_token: String) {
        let mut state = self.inner.write().unwrap();
        state.user = Some(user);
        state.access_token = Some(access_token);
        state.refresh_token = Some(refresh_token);
        state.is_authenticated = true;
        state.is_loading = false;
        state.error = None;
    }

    /// An auth attempt failed: record the message as an overlay on whatever
    /// state exists. A failed re-login must not tear down a live session.
    pub(crate) fn auth_failure(&self, message: impl Into<String>) {
        let mut state = self.inner.write().unwrap();
        state.is_loading = false;
        state.error = Some(message.into());
    }

    /// Token rotation: only the pair changes, the user stays.
    pub(crate) fn tokens_refreshed(&self, access_token: &str, refresh_token: &str) {
        let mut state = self.inner.write().unwrap();
        state.access_token = Some(access_token.to_string());
        state.refresh_token = Some(refresh_token.to_string());
    }

    /// Back to a clean unauthenticated state (logout, failed restore).
    pub(crate) fn reset_unauthenticated(&self) {
        *self.inner.write().unwrap() = SessionState::default();
    }

    /// A refresh failed terminally: drop the session, keep the reason.
    pub(crate) fn session_expired(&self, message: impl Into<String>) {
        *self.inner.write().unwrap() = SessionState {
            error: Some(message.into()),
            ..SessionState::default()
        };
    }

    pub(crate) fn clear_error(&self) {
        self.inner.write().unwrap().error = None;
    }

    pub(crate) fn finish_loading(&self) {
        self.inner.write().unwrap().is_loading = false;
    }
}
