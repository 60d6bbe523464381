//! Polling cycle configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Refresh cadence and error banner lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Milliseconds between cycles
    pub refresh_interval_ms: u64,
    /// Milliseconds an error banner entry stays visible
    pub error_ttl_ms: u64,
    /// Per-request timeout; unset leaves the HTTP client without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

impl PollingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn error_ttl(&self) -> Duration {
        Duration::from_millis(self.error_ttl_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 3000,
            error_ttl_ms: 7000,
            request_timeout_seconds: None,
        }
    }
}
