//! Output formatting helpers for CLI commands

use crate::dashboard::types::Snapshot;
use crate::poller::Source;
use crate::render::{DisplayKind, TableRow, TargetState, TargetView, PLACEHOLDER};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for source display
#[derive(Debug, Clone, serde::Serialize)]
pub struct SourceView {
    pub name: String,
    pub title: String,
    pub endpoint: String,
    pub display: DisplayKind,
}

impl From<&Source> for SourceView {
    fn from(source: &Source) -> Self {
        Self {
            name: source.name().to_string(),
            title: source.title().to_string(),
            endpoint: source.endpoint_label(),
            display: source.display(),
        }
    }
}

/// Format sources as a table
pub fn format_sources_table(sources: &[SourceView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Title", "Display", "Endpoint"]);

    for s in sources {
        let display = match s.display {
            DisplayKind::Table => "table",
            DisplayKind::Text => "text",
        };
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(&s.title),
            Cell::new(display),
            Cell::new(&s.endpoint),
        ]);
    }

    table.to_string()
}

/// Format sources as JSON
pub fn format_sources_json(sources: &[SourceView]) -> String {
    serde_json::to_string_pretty(&json!({ "sources": sources })).unwrap_or_default()
}

/// Format the whole board: every target, then the error list and status line.
pub fn format_board(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for target in &snapshot.targets {
        out.push_str(&format_target(target));
        out.push('\n');
    }

    if !snapshot.errors.is_empty() {
        out.push_str(&format!("{}\n", "Errors".red().bold()));
        for event in &snapshot.errors {
            out.push_str(&format!("  {} {}\n", "✗".red(), event.message));
        }
        out.push('\n');
    }

    let updated = snapshot
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    out.push_str(&format!(
        "{}",
        format!(
            "Last updated: {} · refresh every {}s",
            updated,
            snapshot.refresh_interval_label()
        )
        .dimmed()
    ));

    out
}

/// Format one target with its title, endpoint label and view.
pub fn format_target(target: &TargetState) -> String {
    let mut out = format!("{}\n{}\n", target.title.bold(), target.endpoint.dimmed());

    match &target.view {
        TargetView::Pending => out.push_str(&format!("{}\n", "(pending)".yellow())),
        TargetView::Placeholder => out.push_str(&format!("{}\n", PLACEHOLDER)),
        TargetView::Text { body } => {
            for line in body.lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        TargetView::Table { rows } => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            for row in rows {
                match row {
                    TableRow::Entry { key, value } => {
                        table.add_row(vec![Cell::new(key), Cell::new(value)]);
                    }
                    TableRow::Notice { text } => {
                        table.add_row(vec![Cell::new(text)]);
                    }
                }
            }
            out.push_str(&table.to_string());
            out.push('\n');
        }
    }

    if let Some(error) = &target.error {
        out.push_str(&format!("{}\n", error.red()));
    }

    out
}

/// Format the board as JSON
pub fn format_board_json(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_default()
}
