//! # HTTP surface
//!
//! Serves the dashboard page and its supporting endpoints.
//!
//! ## Endpoints
//!
//! - `GET /` - Dashboard page with the current snapshot embedded
//! - `GET /assets/*path` - Embedded static assets
//! - `GET /api/snapshot` - Current display state as JSON
//! - `GET /ws` - WebSocket push of render and cycle events
//! - `GET /health` - Self health with per-source counts
//! - `GET /metrics` - Prometheus text format metrics
//!
//! ## Example
//!
//! ```no_run
//! use pulseboard::api::{create_router, AppState};
//! use pulseboard::config::PulseboardConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(PulseboardConfig::default());
//! let state = Arc::new(AppState::new(config)?);
//! let app = create_router(Arc::clone(&state));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8130").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod health;

use crate::config::PulseboardConfig;
use crate::cycle::CycleDriver;
use crate::dashboard::types::WebSocketUpdate;
use crate::metrics::MetricsCollector;
use crate::poller::PollError;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Capacity of the dashboard broadcast channel.
const WS_CHANNEL_CAPACITY: usize = 256;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<PulseboardConfig>,
    pub driver: Arc<CycleDriver>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Metrics collector for observability
    pub metrics_collector: Arc<MetricsCollector>,
    /// Broadcast channel feeding WebSocket clients
    pub ws_broadcast: tokio::sync::broadcast::Sender<WebSocketUpdate>,
}

impl AppState {
    /// Create application state and the cycle driver wired to the WebSocket channel.
    pub fn new(config: Arc<PulseboardConfig>) -> Result<Self, PollError> {
        let (ws_broadcast, _) = tokio::sync::broadcast::channel(WS_CHANNEL_CAPACITY);
        let driver =
            Arc::new(CycleDriver::from_config(&config)?.with_broadcast(ws_broadcast.clone()));

        let start_time = Instant::now();

        // Safe to call multiple times - will reuse existing if already set
        let prometheus_handle = crate::metrics::setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            crate::metrics::PrometheusBuilder::new()
                .build_recorder()
                .handle()
        });

        let metrics_collector = Arc::new(MetricsCollector::new(
            Arc::clone(driver.store()),
            start_time,
            prometheus_handle,
        ));

        Ok(Self {
            config,
            driver,
            start_time,
            metrics_collector,
            ws_broadcast,
        })
    }
}

/// Create the router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::dashboard::dashboard_handler))
        .route("/assets/*path", get(crate::dashboard::assets_handler))
        .route("/api/snapshot", get(crate::dashboard::snapshot_handler))
        .route("/ws", get(crate::dashboard::websocket_handler))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
