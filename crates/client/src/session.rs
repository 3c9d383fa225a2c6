//! Session lifecycle over login, refresh, and logout.

use std::sync::Arc;

use tokio::sync::broadcast;

use portico_auth::token;

use crate::backend::{AuthBackend, LoginRequest, RegisterRequest, RegisterResponse};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::refresh::TokenRefresher;
use crate::scheduler::RefreshScheduler;
use crate::state::{SessionEvent, SharedSessionState};
use crate::store::{CredentialStore, Durability};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// The authenticated session: owns the observable state, the credential
/// store wiring, the single-flight refresher, and the proactive scheduler.
///
/// Login and register failures are recorded into the session state *and*
/// returned, so both passive observers and the calling code see them.
pub struct Session {
    state: SharedSessionState,
    store: Arc<CredentialStore>,
    backend: Arc<dyn AuthBackend>,
    refresher: Arc<TokenRefresher>,
    scheduler: RefreshScheduler,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub(crate) fn new(
        config: &ClientConfig,
        store: Arc<CredentialStore>,
        backend: Arc<dyn AuthBackend>,
    ) -> Self {
        let state = SharedSessionState::new();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let refresher = Arc::new(TokenRefresher::new(
            backend.clone(),
            store.clone(),
            state.clone(),
            events.clone(),
        ));
        let scheduler = RefreshScheduler::new(refresher.clone(), store.clone(), config);
        Self {
            state,
            store,
            backend,
            refresher,
            scheduler,
            events,
        }
    }

    /// Handle to the observable state.
    pub fn state(&self) -> &SharedSessionState {
        &self.state
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn refresher(&self) -> Arc<TokenRefresher> {
        self.refresher.clone()
    }

    /// Restore a previous session from storage, refreshing a stale token.
    ///
    /// Call once at startup. Ends with `is_loading` false in every path.
    pub async fn initialize(&self) {
        let tokens = self.store.read_tokens();
        let user = self.store.read_user();

        let (Some(access_token), Some(refresh_token), Some(user)) =
            (tokens.access_token, tokens.refresh_token, user)
        else {
            tracing::debug!("no stored session to restore");
            self.state.finish_loading();
            return;
        };

        if !token::is_expired(&access_token) {
            tracing::info!("restored session for {}", user.email);
            self.state.auth_success(user, access_token, refresh_token);
            self.scheduler.start();
            return;
        }

        tracing::debug!("stored access token expired, refreshing");
        match self.refresher.refresh().await {
            Ok(pair) => {
                tracing::info!("restored session for {} after refresh", user.email);
                self.state
                    .auth_success(user, pair.access_token, pair.refresh_token);
                self.scheduler.start();
            }
            Err(err) => {
                // The refresher already cleared storage and reset the state.
                tracing::warn!("session restore failed: {err}");
                self.state.finish_loading();
            }
        }
    }

    /// Sign in and persist credentials at the requested durability.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(), ApiError> {
        self.state.begin_auth();
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: Some(remember_me),
        };

        match self.backend.login(&request).await {
            Ok(response) => {
                let durability = if remember_me {
                    Durability::Durable
                } else {
                    Durability::Ephemeral
                };
                self.store
                    .store_tokens(&response.access_token, &response.refresh_token, durability);
                self.store.store_user(&response.user, durability);

                tracing::info!("login succeeded for {}", response.user.email);
                self.state.auth_success(
                    response.user,
                    response.access_token,
                    response.refresh_token,
                );
                let _ = self.events.send(SessionEvent::Authenticated);
                self.scheduler.start();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("login failed: {err}");
                self.state.auth_failure(err.message());
                Err(err)
            }
        }
    }

    /// Create an account. Does not authenticate the session.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.state.begin_auth();
        match self.backend.register(request).await {
            Ok(response) => {
                tracing::info!("registration accepted for {}", response.email);
                self.state.finish_loading();
                Ok(response)
            }
            Err(err) => {
                tracing::warn!("registration failed: {err}");
                self.state.auth_failure(err.message());
                Err(err)
            }
        }
    }

    /// Rotate the token pair now (single-flight with concurrent triggers).
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.refresher.refresh().await.map(|_| ())
    }

    /// Sign out: notify the server best-effort, then always clear locally.
    pub async fn logout(&self) {
        let access_token = self.store.read_tokens().access_token;
        if let Err(err) = self.backend.logout(access_token.as_deref()).await {
            tracing::warn!("logout call failed, clearing local session anyway: {err}");
        }

        self.scheduler.shutdown();
        self.store.clear();
        self.state.reset_unauthenticated();
        let _ = self.events.send(SessionEvent::LoggedOut);
        tracing::info!("logged out");
    }

    /// Drop the recorded auth error, leaving everything else untouched.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }
}
