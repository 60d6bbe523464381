//! Shared helpers for Pulseboard integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use pulseboard::api::{create_router, AppState};
use pulseboard::banner::ErrorBanner;
use pulseboard::config::{PulseboardConfig, SourceConfig};
use pulseboard::cycle::CycleDriver;
use pulseboard::poller::{Poller, Source};
use pulseboard::render::{DisplayKind, DisplayStore, Renderer};
use std::sync::Arc;
use std::time::Duration;

/// Error TTL used by the dashboard pages.
pub const ERROR_TTL: Duration = Duration::from_millis(7000);

/// Refresh period used by the dashboard pages.
pub const REFRESH: Duration = Duration::from_millis(3000);

pub fn source_config(name: &str, url: &str, display: DisplayKind) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        title: None,
        url: url.to_string(),
        display,
        index: None,
    }
}

pub fn config_with(sources: Vec<SourceConfig>) -> PulseboardConfig {
    let mut config = PulseboardConfig::default();
    config.sources = sources;
    config
}

/// Renderer over a fresh store and banner.
pub fn renderer() -> Renderer {
    Renderer::new(
        Arc::new(DisplayStore::new()),
        Arc::new(ErrorBanner::new(ERROR_TTL)),
    )
}

/// Driver over fresh state with the default refresh period.
pub fn driver_for(sources: Vec<Source>) -> CycleDriver {
    CycleDriver::new(sources, Poller::new(None).unwrap(), renderer(), REFRESH)
}

pub fn test_state(config: PulseboardConfig) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(config)).unwrap())
}

pub fn test_router(config: PulseboardConfig) -> (axum::Router, Arc<AppState>) {
    let state = test_state(config);
    (create_router(Arc::clone(&state)), state)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
