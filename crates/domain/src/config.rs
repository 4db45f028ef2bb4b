//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_POLLING_WAIT_MS, DEFAULT_POLLING_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_TOKEN_EXPIRY_MARGIN_SECS, DEFAULT_WAIT_BEFORE_POLLING_MS,
};

/// RDI client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdiClientConfig {
    /// Timeout applied to every HTTP call, login included
    pub request_timeout_ms: u64,
    /// A token is considered expired this many seconds before its `exp`
    pub token_expiry_margin_secs: u64,
    pub polling: PollingConfig,
    /// RDI deployments are frequently served with self-signed certificates
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for RdiClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            token_expiry_margin_secs: DEFAULT_TOKEN_EXPIRY_MARGIN_SECS,
            polling: PollingConfig::default(),
            accept_invalid_certs: true,
            user_agent: concat!("rdi-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RdiClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn token_expiry_margin(&self) -> Duration {
        Duration::from_secs(self.token_expiry_margin_secs)
    }
}

/// Action polling bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between submitting an action and the first status poll
    pub wait_before_polling_ms: u64,
    /// Fixed delay between two polls
    pub interval_ms: u64,
    /// Total polling time before the action is reported as timed out
    pub max_wait_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            wait_before_polling_ms: DEFAULT_WAIT_BEFORE_POLLING_MS,
            interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            max_wait_ms: DEFAULT_MAX_POLLING_WAIT_MS,
        }
    }
}

impl PollingConfig {
    pub fn wait_before_polling(&self) -> Duration {
        Duration::from_millis(self.wait_before_polling_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}
