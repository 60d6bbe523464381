//! Error banner: transient, self-expiring notifications for poll failures.
//!
//! Every failure raises its own entry, even when an identical message is still
//! visible. Entries are never capped or coalesced; each one disappears when its
//! own TTL elapses.

mod ephemeral;

pub use ephemeral::EphemeralList;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One banner entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Unique, time-derived token
    pub id: u64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ErrorEvent {
    /// Stable element key for the page, e.g. `error-1700000000123`.
    pub fn element_id(&self) -> String {
        format!("error-{}", self.id)
    }
}

/// Shared error list shown above the dashboard targets.
#[derive(Debug)]
pub struct ErrorBanner {
    events: EphemeralList<ErrorEvent>,
    visible: AtomicBool,
}

impl ErrorBanner {
    pub fn new(ttl: Duration) -> Self {
        Self {
            events: EphemeralList::new(ttl),
            visible: AtomicBool::new(false),
        }
    }

    /// Prepend a new entry and show the list. The entry removes itself after the TTL.
    pub fn raise(&self, message: impl Into<String>) -> ErrorEvent {
        let message = message.into();
        let event = self.events.insert_with(|id| ErrorEvent {
            id,
            message,
            created_at: Utc::now(),
        });
        self.visible.store(true, Ordering::Relaxed);

        tracing::info!(id = event.id, message = %event.message, "Error banner raised");
        event
    }

    /// Remove an entry before its TTL. No-op if it already expired.
    pub fn dismiss(&self, id: u64) -> bool {
        self.events.remove(id).is_some()
    }

    /// Visible entries, newest first.
    pub fn events(&self) -> Vec<ErrorEvent> {
        self.events.items()
    }

    /// Whether the list has been shown. It stays shown once an error occurred.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }

    pub fn ttl(&self) -> Duration {
        self.events.ttl()
    }
}
