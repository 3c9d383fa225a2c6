//! Client configuration.

use std::time::Duration;

/// Default API base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_REFRESH_HORIZON: Duration = Duration::from_secs(5 * 60);

/// Settings for a [`crate::PorticoClient`].
///
/// The refresh knobs exist so tests can shrink the scheduler's timing; the
/// defaults match the production cadence (check every minute, rotate tokens
/// five minutes before expiry).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout applied to every HTTP call.
    pub timeout: Duration,
    /// How often the refresh scheduler wakes up to inspect the access token.
    pub refresh_check_interval: Duration,
    /// Remaining lifetime below which a token counts as expiring soon.
    pub refresh_horizon: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with default timings.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            refresh_check_interval: DEFAULT_REFRESH_CHECK_INTERVAL,
            refresh_horizon: DEFAULT_REFRESH_HORIZON,
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Honors `PORTICO_API_BASE_URL` and `PORTICO_API_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let base_url = match std::env::var("PORTICO_API_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                tracing::warn!("PORTICO_API_BASE_URL not set, using {}", DEFAULT_BASE_URL);
                DEFAULT_BASE_URL.to_string()
            }
        };

        let mut config = Self::new(base_url);
        if let Ok(raw) = std::env::var("PORTICO_API_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => tracing::warn!("ignoring invalid PORTICO_API_TIMEOUT_MS value '{}'", raw),
            }
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_refresh_check_interval(mut self, interval: Duration) -> Self {
        self.refresh_check_interval = interval;
        self
    }

    pub fn with_refresh_horizon(mut self, horizon: Duration) -> Self {
        self.refresh_horizon = horizon;
        self
    }
}
