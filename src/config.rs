//! Configuration for the taskwire client

use std::env;
use std::time::Duration;

/// Default per-request timeout for HTTP calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between task status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default client-side wait limit for one task
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(300);

/// Client configuration
///
/// The base endpoint and API token are immutable for the lifetime of a
/// client instance; every operation reads them, none mutates them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint of the service, e.g. `https://api.example.com/v1`
    pub base_url: String,

    /// Bearer token sent with every authenticated call
    pub api_token: String,

    /// Timeout applied to individual HTTP requests
    pub request_timeout: Duration,

    /// Delay between task status polls
    pub poll_interval: Duration,

    /// Wall-clock limit for waiting on one task
    pub task_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with default timing values
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    /// Load configuration from environment variables
    ///
    /// `TASKWIRE_BASE_URL` and `TASKWIRE_API_TOKEN` are required;
    /// `TASKWIRE_POLL_INTERVAL_MS` and `TASKWIRE_TASK_TIMEOUT_SECS` override
    /// the timing defaults. A `.env` file is honored if present.
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(
            env::var("TASKWIRE_BASE_URL")?,
            env::var("TASKWIRE_API_TOKEN")?,
        );

        if let Some(ms) = read_u64("TASKWIRE_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = read_u64("TASKWIRE_TASK_TIMEOUT_SECS") {
            config.task_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn read_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_timing_defaults() {
        let config = ClientConfig::new("https://api.example.com", "token-123");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.api_token, "token-123");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.task_timeout, DEFAULT_TASK_TIMEOUT);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
