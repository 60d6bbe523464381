//! # Metrics Collection Module
//!
//! Prometheus export of poll activity, rendered at `GET /metrics`.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `pulseboard_polls_total{source, outcome}` - Poll attempts by outcome
//!   (`success`, `network`, `http_status`, `parse`)
//! - `pulseboard_cycles_total` - Completed refresh cycles
//!
//! **Histograms:**
//! - `pulseboard_poll_duration_seconds{source}` - Poll latency
//!
//! **Gauges:**
//! - `pulseboard_sources_total` - Configured sources
//! - `pulseboard_sources_healthy` - Sources whose last poll succeeded
//! - `pulseboard_errors_visible` - Error banner entries currently shown

pub mod handler;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use crate::render::{DisplayStore, TargetView};
use std::sync::Arc;
use std::time::Instant;

/// Central coordinator for gauge computation and rendering.
pub struct MetricsCollector {
    store: Arc<DisplayStore>,
    start_time: Instant,
    prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(
        store: Arc<DisplayStore>,
        start_time: Instant,
        prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
    ) -> Self {
        Self {
            store,
            start_time,
            prometheus_handle,
        }
    }

    /// Update source gauges from the display store.
    pub fn update_source_gauges(&self) {
        let targets = self.store.targets();
        metrics::gauge!("pulseboard_sources_total").set(targets.len() as f64);

        let healthy = targets
            .iter()
            .filter(|t| matches!(t.view, TargetView::Table { .. } | TargetView::Text { .. }))
            .count();
        metrics::gauge!("pulseboard_sources_healthy").set(healthy as f64);
    }

    /// Get uptime in seconds since startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize Prometheus metrics exporter with poll latency buckets (seconds).
pub fn setup_metrics(
) -> Result<metrics_exporter_prometheus::PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let latency_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("pulseboard_poll_duration_seconds".to_string()),
            latency_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}
