//! Renderer: turns poll outcomes into display target views.
//!
//! Rendering is synchronous and idempotent. A target's view depends only on
//! its display kind and the latest outcome, so re-rendering the same outcome
//! leaves the store unchanged. Raising error banner entries is a separate step
//! ([`Renderer::present`]) that only runs for fresh poll results.

mod store;

pub use store::{DisplayStore, TargetState};

use crate::banner::{ErrorBanner, ErrorEvent};
use crate::poller::{Outcome, PollReport, Source};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shown in a target whose last poll failed.
pub const PLACEHOLDER: &str = "—";

/// Single row shown for an empty table payload.
pub const NO_DATA: &str = "No data.";

/// How a target displays a successful payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// One key/value row per payload entry
    #[default]
    Table,
    /// Indented JSON text block
    Text,
}

/// Current content of a display target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetView {
    /// No outcome yet
    Pending,
    Table { rows: Vec<TableRow> },
    Text { body: String },
    /// Last poll failed
    Placeholder,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableRow {
    Entry { key: String, value: String },
    /// Spans all columns
    Notice { text: String },
}

/// Cell text for a payload value: strings verbatim, objects and arrays as compact JSON.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Rows for a table target, in the payload's key order.
///
/// Arrays use their indices as keys; a bare scalar becomes a single `value` row.
pub fn table_rows(payload: &Value) -> Vec<TableRow> {
    let rows: Vec<TableRow> = match payload {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| TableRow::Entry {
                key: key.clone(),
                value: format_cell(value),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, value)| TableRow::Entry {
                key: i.to_string(),
                value: format_cell(value),
            })
            .collect(),
        scalar => vec![TableRow::Entry {
            key: "value".to_string(),
            value: format_cell(scalar),
        }],
    };

    if rows.is_empty() {
        vec![TableRow::Notice {
            text: NO_DATA.to_string(),
        }]
    } else {
        rows
    }
}

/// Payload as human-readable JSON with two-space indentation.
pub fn pretty_text(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// View for `outcome` on a target of the given kind.
pub fn render_view(display: DisplayKind, outcome: &Outcome) -> TargetView {
    match (outcome, display) {
        (Outcome::Success { payload }, DisplayKind::Table) => TargetView::Table {
            rows: table_rows(payload),
        },
        (Outcome::Success { payload }, DisplayKind::Text) => TargetView::Text {
            body: pretty_text(payload),
        },
        (Outcome::Failure { .. }, _) => TargetView::Placeholder,
    }
}

impl TargetView {
    /// Plain text content, one line per row.
    pub fn text_content(&self) -> String {
        match self {
            TargetView::Pending => String::new(),
            TargetView::Placeholder => PLACEHOLDER.to_string(),
            TargetView::Text { body } => body.clone(),
            TargetView::Table { rows } => rows
                .iter()
                .map(|row| match row {
                    TableRow::Entry { key, value } => format!("{}\t{}", key, value),
                    TableRow::Notice { text } => text.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Writes outcomes into the display store and raises banner entries for failures.
pub struct Renderer {
    store: Arc<DisplayStore>,
    banner: Arc<ErrorBanner>,
    log_payloads: bool,
}

impl Renderer {
    pub fn new(store: Arc<DisplayStore>, banner: Arc<ErrorBanner>) -> Self {
        Self {
            store,
            banner,
            log_payloads: false,
        }
    }

    /// Log every successful payload at debug level.
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    pub fn store(&self) -> &Arc<DisplayStore> {
        &self.store
    }

    pub fn banner(&self) -> &Arc<ErrorBanner> {
        &self.banner
    }

    /// Replace target `key`'s view with one derived from `outcome`.
    ///
    /// Returns false if no such target is registered.
    pub fn render(&self, key: &str, outcome: &Outcome) -> bool {
        let Some(target) = self.store.get(key) else {
            tracing::warn!(target_key = %key, "Render for unregistered target ignored");
            return false;
        };

        let view = render_view(target.display, outcome);
        let error = match outcome {
            Outcome::Success { .. } => None,
            Outcome::Failure { message } => {
                Some(format!("Failed to load {}: {}", target.title, message))
            }
        };
        self.store.update(key, view, error)
    }

    /// Render a fresh poll result; failures also raise a banner entry.
    pub fn present(&self, source: &Source, report: &PollReport) -> Option<ErrorEvent> {
        self.render(source.name(), &report.outcome);

        match &report.outcome {
            Outcome::Success { payload } => {
                if self.log_payloads {
                    tracing::debug!(source = %source.name(), payload = %payload, "Received data");
                }
                None
            }
            Outcome::Failure { message } => Some(self.banner.raise(format!(
                "Failed to load {} from {}: {}",
                source.title(),
                report.url,
                message
            ))),
        }
    }
}
