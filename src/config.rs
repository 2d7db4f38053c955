// config.rs - Environment-driven client settings
use std::time::Duration;

use crate::controller::DEFAULT_POLL_INTERVAL;

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Settings for the montage client, read from the environment
/// (with `.env` support via dotenvy in the binary).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the montage backend
    pub server_url: String,
    /// Delay between status checks
    pub poll_interval: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let server_url = std::env::var("MONTAGE_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        // A zero period would panic the interval timer; treat it like an
        // unset variable
        let poll_interval = std::env::var("MONTAGE_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        Self {
            server_url,
            poll_interval,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
