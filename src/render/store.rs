//! Display store: target key → currently rendered view.

use super::{DisplayKind, TargetView};
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Rendered state of one display target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    /// Stable key (the source name)
    pub key: String,
    pub title: String,
    /// `Endpoint: <url>` label
    pub endpoint: String,
    pub display: DisplayKind,
    pub view: TargetView,
    /// Per-target error line from the last failed attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    position: usize,
}

/// Shared display surface written by the renderer and read by the page/CLI.
///
/// Targets keep registration order; the last-updated timestamp is stored as
/// epoch milliseconds, `0` meaning no cycle has completed yet.
#[derive(Debug, Default)]
pub struct DisplayStore {
    targets: DashMap<String, TargetState>,
    last_updated_ms: AtomicI64,
}

impl DisplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target in the pending state. Re-registering keeps the old position.
    pub fn register(&self, key: &str, title: &str, endpoint: &str, display: DisplayKind) {
        let position = self.targets.len();
        self.targets
            .entry(key.to_string())
            .and_modify(|t| {
                t.title = title.to_string();
                t.endpoint = endpoint.to_string();
                t.display = display;
            })
            .or_insert_with(|| TargetState {
                key: key.to_string(),
                title: title.to_string(),
                endpoint: endpoint.to_string(),
                display,
                view: TargetView::Pending,
                error: None,
                position,
            });
    }

    /// Replace a target's view and error line. Returns false for unknown keys.
    pub fn update(&self, key: &str, view: TargetView, error: Option<String>) -> bool {
        match self.targets.get_mut(key) {
            Some(mut target) => {
                target.view = view;
                target.error = error;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<TargetState> {
        self.targets.get(key).map(|t| t.clone())
    }

    pub fn view(&self, key: &str) -> Option<TargetView> {
        self.targets.get(key).map(|t| t.view.clone())
    }

    /// All targets in registration order.
    pub fn targets(&self) -> Vec<TargetState> {
        let mut targets: Vec<_> = self.targets.iter().map(|t| t.clone()).collect();
        targets.sort_by_key(|t| t.position);
        targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn touch_last_updated(&self, at: DateTime<Utc>) {
        self.last_updated_ms
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self.last_updated_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }
}
