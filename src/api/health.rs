//! Health check endpoint handler.

use crate::api::AppState;
use crate::render::{TargetState, TargetView};
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub sources: SourceCounts,
}

/// Per-source counts derived from the latest rendered views.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct SourceCounts {
    pub total: usize,
    pub healthy: usize,
    pub failing: usize,
    pub pending: usize,
}

impl SourceCounts {
    pub fn from_targets(targets: &[TargetState]) -> Self {
        let mut counts = SourceCounts {
            total: targets.len(),
            ..Default::default()
        };
        for target in targets {
            match target.view {
                TargetView::Table { .. } | TargetView::Text { .. } => counts.healthy += 1,
                TargetView::Placeholder => counts.failing += 1,
                TargetView::Pending => counts.pending += 1,
            }
        }
        counts
    }

    pub fn status(&self) -> &'static str {
        match (self.healthy, self.total) {
            (h, t) if h == t && t > 0 => "healthy",
            (h, _) if h > 0 => "degraded",
            _ if self.pending == self.total => "starting",
            _ => "unhealthy",
        }
    }
}

/// GET /health - Return dashboard health status.
pub async fn handle(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let counts = SourceCounts::from_targets(&state.driver.store().targets());

    Json(HealthResponse {
        status: counts.status().to_string(),
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        uptime_seconds: state.metrics_collector.uptime_seconds(),
        sources: counts,
    })
}
