//! Cycle driver: the timer-driven poll-and-render loop.
//!
//! A cycle dispatches every source at once and renders each outcome as soon as
//! it arrives, then stamps the last-updated time. Cycles are spawned on every
//! timer tick without waiting for the previous one, so a slow endpoint can leave
//! two requests for the same source in flight; whichever response lands last
//! wins its target. Stale requests are never cancelled.

use crate::banner::ErrorBanner;
use crate::config::PulseboardConfig;
use crate::dashboard::types::{Snapshot, UpdateType, WebSocketUpdate};
use crate::poller::{PollError, Poller, Source};
use crate::render::{DisplayStore, Renderer};
use chrono::Utc;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Per-cycle tally, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl CycleSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns the sources and drives poll → render for each cycle.
pub struct CycleDriver {
    sources: Vec<Source>,
    poller: Poller,
    renderer: Renderer,
    refresh_interval: Duration,
    updates: Option<broadcast::Sender<WebSocketUpdate>>,
}

impl CycleDriver {
    /// Create a driver and register one display target per source.
    pub fn new(
        sources: Vec<Source>,
        poller: Poller,
        renderer: Renderer,
        refresh_interval: Duration,
    ) -> Self {
        for source in &sources {
            renderer.store().register(
                source.name(),
                source.title(),
                &source.endpoint_label(),
                source.display(),
            );
        }

        Self {
            sources,
            poller,
            renderer,
            refresh_interval,
            updates: None,
        }
    }

    /// Build the full pipeline (store, banner, poller, renderer) from configuration.
    pub fn from_config(config: &PulseboardConfig) -> Result<Self, PollError> {
        let store = Arc::new(DisplayStore::new());
        let banner = Arc::new(ErrorBanner::new(config.polling.error_ttl()));
        let renderer =
            Renderer::new(store, banner).with_payload_logging(config.logging.log_payloads);
        let poller = Poller::new(config.polling.request_timeout_seconds)?;
        let sources = config.sources.iter().map(Source::from).collect();

        Ok(Self::new(
            sources,
            poller,
            renderer,
            config.polling.refresh_interval(),
        ))
    }

    /// Publish render and cycle events to dashboard clients.
    pub fn with_broadcast(mut self, sender: broadcast::Sender<WebSocketUpdate>) -> Self {
        self.updates = Some(sender);
        self
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn store(&self) -> &Arc<DisplayStore> {
        self.renderer.store()
    }

    pub fn banner(&self) -> &Arc<ErrorBanner> {
        self.renderer.banner()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Current display state.
    pub fn snapshot(&self) -> Snapshot {
        let banner = self.banner();
        Snapshot {
            targets: self.store().targets(),
            errors: banner.events(),
            errors_visible: banner.is_visible(),
            last_updated: self.store().last_updated(),
            refresh_interval_ms: self.refresh_interval.as_millis() as u64,
            error_ttl_ms: banner.ttl().as_millis() as u64,
        }
    }

    /// Poll every source concurrently, render each outcome on arrival, then stamp the time.
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();
        let mut arrivals = self.poller.poll_each(&self.sources);

        while let Some((i, report)) = arrivals.next().await {
            let source = &self.sources[i];
            let raised = self.renderer.present(source, &report);

            if report.outcome.is_success() {
                summary.succeeded.push(source.name().to_string());
            } else {
                summary.failed.push(source.name().to_string());
            }

            if let Some(target) = self.store().get(source.name()) {
                self.publish(UpdateType::TargetRendered, &target);
            }
            if let Some(event) = raised {
                self.publish(UpdateType::ErrorRaised, &event);
            }
        }

        self.store().touch_last_updated(Utc::now());
        metrics::counter!("pulseboard_cycles_total").increment(1);
        metrics::gauge!("pulseboard_errors_visible").set(self.banner().events().len() as f64);
        self.publish(UpdateType::CycleComplete, &self.snapshot());

        tracing::debug!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Refresh cycle completed"
        );
        summary
    }

    /// Run cycles on a fixed period until cancelled. The first cycle starts immediately.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.refresh_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                sources = self.sources.len(),
                refresh_interval_ms = self.refresh_interval.as_millis() as u64,
                "Cycle driver started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Cycle driver shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let driver = Arc::clone(&self);
                        tokio::spawn(async move {
                            driver.run_cycle().await;
                        });
                    }
                }
            }
        })
    }

    fn publish<T: serde::Serialize>(&self, update_type: UpdateType, data: &T) {
        if let Some(sender) = &self.updates {
            let update = WebSocketUpdate {
                update_type,
                data: serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
            };
            // Ignore error if no receivers are listening
            let _ = sender.send(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayKind, TableRow, TargetView};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn driver_for(sources: Vec<Source>, ttl: Duration) -> CycleDriver {
        let store = Arc::new(DisplayStore::new());
        let banner = Arc::new(ErrorBanner::new(ttl));
        CycleDriver::new(
            sources,
            Poller::new(None).unwrap(),
            Renderer::new(store, banner),
            Duration::from_millis(3000),
        )
    }

    #[test]
    fn test_new_registers_targets_pending() {
        let driver = driver_for(
            vec![
                Source::new("processing", "http://h/p"),
                Source::new("admission", "http://h/a").with_display(DisplayKind::Text),
            ],
            Duration::from_secs(7),
        );

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.targets.len(), 2);
        assert_eq!(snapshot.targets[0].view, TargetView::Pending);
        assert_eq!(snapshot.targets[1].display, DisplayKind::Text);
        assert_eq!(snapshot.targets[1].endpoint, "Endpoint: http://h/a");
        assert!(snapshot.last_updated.is_none());
        assert_eq!(snapshot.refresh_interval_ms, 3000);
        assert_eq!(snapshot.error_ttl_ms, 7000);
    }

    #[test]
    fn test_from_config_builds_sources() {
        let config: PulseboardConfig =
            toml::from_str(include_str!("../../pulseboard.example.toml")).unwrap();
        let driver = CycleDriver::from_config(&config).unwrap();
        let names: Vec<_> = driver.sources().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["processing", "analyzer", "admission", "capacity"]);
        assert_eq!(driver.refresh_interval(), Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn test_cycle_updates_timestamp_even_when_all_fail() {
        let driver = driver_for(
            vec![Source::new("down", "http://127.0.0.1:1/stats")],
            Duration::from_secs(7),
        );
        let summary = driver.run_cycle().await;

        assert_eq!(summary.failed, vec!["down".to_string()]);
        assert!(!summary.all_succeeded());
        assert!(driver.store().last_updated().is_some());
        assert_eq!(driver.store().view("down"), Some(TargetView::Placeholder));
        assert_eq!(driver.banner().events().len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_publishes_updates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"x": 5})))
            .mount(&server)
            .await;

        let (tx, mut rx) = broadcast::channel(16);
        let driver = driver_for(
            vec![Source::new("stats", format!("{}/a", server.uri()))],
            Duration::from_secs(7),
        )
        .with_broadcast(tx);

        driver.run_cycle().await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.update_type, UpdateType::TargetRendered);
        assert_eq!(first.data["key"], "stats");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.update_type, UpdateType::CycleComplete);
        let snapshot: Snapshot = serde_json::from_value(second.data).unwrap();
        assert_eq!(
            snapshot.target("stats").unwrap().view,
            TargetView::Table {
                rows: vec![TableRow::Entry {
                    key: "x".to_string(),
                    value: "5".to_string()
                }]
            }
        );
    }

    #[tokio::test]
    async fn test_start_runs_first_cycle_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let store = Arc::new(DisplayStore::new());
        let banner = Arc::new(ErrorBanner::new(Duration::from_secs(7)));
        // Long period: only the immediate first tick can fire during this test
        let driver = Arc::new(CycleDriver::new(
            vec![Source::new("stats", format!("{}/a", server.uri()))],
            Poller::new(None).unwrap(),
            Renderer::new(store, banner),
            Duration::from_secs(3600),
        ));

        let cancel = CancellationToken::new();
        let handle = Arc::clone(&driver).start(cancel.clone());

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while driver.store().last_updated().is_none() {
            assert!(tokio::time::Instant::now() < deadline, "first cycle never ran");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(
            driver.store().view("stats").unwrap().text_content(),
            "No data."
        );
    }
}
