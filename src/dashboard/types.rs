//! Type definitions for dashboard data structures

use crate::banner::ErrorEvent;
use crate::render::TargetState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete display state: everything the page needs to paint itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Targets in configuration order
    pub targets: Vec<TargetState>,
    /// Visible error banner entries, newest first
    pub errors: Vec<ErrorEvent>,
    /// Whether the error list has been shown
    pub errors_visible: bool,
    /// End of the most recent completed cycle
    pub last_updated: Option<DateTime<Utc>>,
    pub refresh_interval_ms: u64,
    pub error_ttl_ms: u64,
}

impl Snapshot {
    pub fn target(&self, key: &str) -> Option<&TargetState> {
        self.targets.iter().find(|t| t.key == key)
    }

    /// Refresh interval in seconds with one decimal, e.g. `3.0`.
    pub fn refresh_interval_label(&self) -> String {
        format!("{:.1}", self.refresh_interval_ms as f64 / 1000.0)
    }
}

/// WebSocket update message sent to dashboard clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketUpdate {
    /// Type of update
    pub update_type: UpdateType,
    /// JSON payload for the update
    pub data: serde_json::Value,
}

/// Type of WebSocket update
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpdateType {
    /// One target was re-rendered; data is its `TargetState`
    TargetRendered,
    /// A banner entry was raised; data is the `ErrorEvent`
    ErrorRaised,
    /// A cycle finished; data is the full `Snapshot`
    CycleComplete,
}
