//! Background worker for proactive token refresh.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use portico_auth::token;

use crate::config::ClientConfig;
use crate::refresh::TokenRefresher;
use crate::store::CredentialStore;

/// Periodically inspects the access token and refreshes it before expiry.
///
/// The worker only runs while both tokens are present: it exits on its own
/// once credentials disappear and is restarted by the next login. `start` and
/// `shutdown` are both idempotent.
pub struct RefreshScheduler {
    refresher: Arc<TokenRefresher>,
    store: Arc<CredentialStore>,
    check_interval: Duration,
    horizon_secs: i64,
    worker: Mutex<Option<WorkerHandle>>,
}

struct WorkerHandle {
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    pub(crate) fn new(
        refresher: Arc<TokenRefresher>,
        store: Arc<CredentialStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            refresher,
            store,
            check_interval: config.refresh_check_interval,
            horizon_secs: config.refresh_horizon.as_secs() as i64,
            worker: Mutex::new(None),
        }
    }

    /// Spawn the background check loop. No-op while a worker is live.
    pub fn start(&self) {
        let mut worker = self.worker.lock().unwrap();
        if let Some(handle) = worker.as_ref() {
            if !handle.task.is_finished() {
                tracing::debug!("refresh scheduler already running");
                return;
            }
        }

        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(Self::run(
            self.refresher.clone(),
            self.store.clone(),
            self.check_interval,
            self.horizon_secs,
            shutdown.clone(),
        ));
        *worker = Some(WorkerHandle { shutdown, task });
        tracing::debug!("refresh scheduler started");
    }

    async fn run(
        refresher: Arc<TokenRefresher>,
        store: Arc<CredentialStore>,
        check_interval: Duration,
        horizon_secs: i64,
        shutdown: Arc<Notify>,
    ) {
        let mut interval = tokio::time::interval(check_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    tracing::debug!("refresh scheduler received shutdown signal");
                    break;
                }
                _ = interval.tick() => {
                    let tokens = store.read_tokens();
                    let (Some(access_token), Some(_)) = (tokens.access_token, tokens.refresh_token)
                    else {
                        tracing::debug!("credentials gone, refresh scheduler exiting");
                        break;
                    };

                    if !token::is_expiring_soon_at(&access_token, Utc::now(), horizon_secs) {
                        continue;
                    }

                    tracing::info!("access token expiring soon, refreshing");
                    if let Err(err) = refresher.refresh().await {
                        // The refresher already tore the session down.
                        tracing::warn!("scheduled token refresh failed: {err}");
                        break;
                    }
                }
            }
        }

        tracing::debug!("refresh scheduler stopped");
    }

    /// Signal the worker to exit. No-op when none is running.
    pub fn shutdown(&self) {
        if let Some(handle) = self.worker.lock().unwrap().take() {
            handle.shutdown.notify_one();
            tracing::debug!("refresh scheduler shutting down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
