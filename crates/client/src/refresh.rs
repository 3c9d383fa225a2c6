//! Single-flight token refresh.
//!
//! The scheduler (proactive) and the gateway (reactive, on 401) both funnel
//! through one refresher, so concurrent triggers coalesce into a single
//! outbound exchange instead of racing over storage.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};

use portico_auth::token;

use crate::backend::AuthBackend;
use crate::error::ApiError;
use crate::state::{SessionEvent, SharedSessionState};
use crate::store::CredentialStore;

/// Token pair produced by a refresh, fresh or adopted from a peer flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Coalesces concurrent refresh attempts into one exchange.
///
/// A failed exchange is terminal for the session: storage is cleared, state
/// resets, and [`SessionEvent::SessionExpired`] is broadcast so the app can
/// route to sign-in. A failed refresh is never retried.
pub struct TokenRefresher {
    backend: Arc<dyn AuthBackend>,
    store: Arc<CredentialStore>,
    state: SharedSessionState,
    events: broadcast::Sender<SessionEvent>,
    flight: Mutex<()>,
}

impl TokenRefresher {
    pub(crate) fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<CredentialStore>,
        state: SharedSessionState,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            backend,
            store,
            state,
            events,
            flight: Mutex::new(()),
        }
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// Callers that waited on a concurrent flight adopt its freshly rotated
    /// pair instead of spending another refresh token.
    pub async fn refresh(&self) -> Result<TokenPair, ApiError> {
        let before = self.store.read_tokens();
        let _flight = self.flight.lock().await;

        // A flight that finished while we waited has already rotated the pair.
        let current = self.store.read_tokens();
        if let (Some(access_token), Some(refresh_token)) =
            (&current.access_token, &current.refresh_token)
        {
            if current.access_token != before.access_token && !token::is_expired(access_token) {
                tracing::debug!("adopting tokens rotated by a concurrent refresh");
                return Ok(TokenPair {
                    access_token: access_token.clone(),
                    refresh_token: refresh_token.clone(),
                });
            }
        }

        let Some(refresh_token) = current.refresh_token else {
            // Nothing to tear down: without a refresh token there is no session.
            return Err(ApiError::unauthorized("No refresh token available"));
        };

        match self.backend.refresh(&refresh_token).await {
            Ok(response) => {
                let durability = self.store.active_durability();
                self.store
                    .store_tokens(&response.access_token, &response.refresh_token, durability);
                self.state
                    .tokens_refreshed(&response.access_token, &response.refresh_token);
                let _ = self.events.send(SessionEvent::TokensRefreshed);
                tracing::debug!("access token rotated");
                Ok(TokenPair {
                    access_token: response.access_token,
                    refresh_token: response.refresh_token,
                })
            }
            Err(err) => {
                tracing::warn!("token refresh failed, ending session: {err}");
                self.store.clear();
                self.state.session_expired(err.message());
                let _ = self.events.send(SessionEvent::SessionExpired);
                Err(err)
            }
        }
    }
}
