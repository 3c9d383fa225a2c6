//! Entry point wiring the session, gateway, and endpoint groups together.

use std::sync::Arc;

use crate::api::{AuthApi, BranchesApi, MenusApi, RegionsApi, UsersApi};
use crate::backend::{AuthBackend, HttpAuthBackend};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::gateway::HttpGateway;
use crate::session::Session;
use crate::store::CredentialStore;

/// One fully wired API client.
///
/// Construct it once at process start and hand references (or an `Arc`) to
/// consumers; all shared state lives behind the session handle it owns.
pub struct PorticoClient {
    session: Arc<Session>,
    gateway: Arc<HttpGateway>,
    auth: AuthApi,
    users: UsersApi,
    regions: RegionsApi,
    branches: BranchesApi,
    menus: MenusApi,
}

impl PorticoClient {
    /// Client with credentials stored under the OS config directory.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let store = CredentialStore::open_default()
            .map_err(|err| ApiError::unknown(format!("credential store unavailable: {err:#}")))?;
        Self::with_store(config, Arc::new(store))
    }

    /// Client with an explicit credential store location.
    pub fn with_store(config: ClientConfig, store: Arc<CredentialStore>) -> Result<Self, ApiError> {
        let backend: Arc<dyn AuthBackend> = Arc::new(HttpAuthBackend::new(&config)?);
        Self::with_backend(config, store, backend)
    }

    /// Client with a custom auth collaborator (tests, alternative transports).
    pub fn with_backend(
        config: ClientConfig,
        store: Arc<CredentialStore>,
        backend: Arc<dyn AuthBackend>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(Session::new(&config, store.clone(), backend));
        let gateway = Arc::new(HttpGateway::new(&config, store, session.refresher())?);
        Ok(Self {
            auth: AuthApi::new(gateway.clone()),
            users: UsersApi::new(gateway.clone()),
            regions: RegionsApi::new(gateway.clone()),
            branches: BranchesApi::new(gateway.clone()),
            menus: MenusApi::new(gateway.clone()),
            session,
            gateway,
        })
    }

    /// The session state machine (login, logout, observable state, events).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Account management endpoints.
    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn users(&self) -> &UsersApi {
        &self.users
    }

    pub fn regions(&self) -> &RegionsApi {
        &self.regions
    }

    pub fn branches(&self) -> &BranchesApi {
        &self.branches
    }

    pub fn menus(&self) -> &MenusApi {
        &self.menus
    }

    /// Probe the backend's health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        self.gateway.check_connectivity().await
    }
}
