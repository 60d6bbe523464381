//! HTTP handlers for dashboard routes

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use rust_embed::RustEmbed;
use std::sync::Arc;

use crate::api::AppState;

/// Marker the page template carries for the embedded initial snapshot.
const INITIAL_DATA_SLOT: &str = r#"<script id="initial-data" type="application/json">{}</script>"#;

/// Embedded dashboard assets from dashboard/ directory
#[derive(RustEmbed)]
#[folder = "dashboard/"]
struct DashboardAssets;

/// Serves the main dashboard HTML page with the current snapshot injected
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(content) = DashboardAssets::get("index.html") else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Dashboard HTML not found").into_response();
    };

    let html = match std::str::from_utf8(&content.data) {
        Ok(html) => html,
        Err(_) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid HTML encoding").into_response()
        }
    };

    let snapshot = state.driver.snapshot();
    // `</` would let payload text close the script element early
    let snapshot_json = serde_json::to_string(&snapshot)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    let updated_html = html.replace(
        INITIAL_DATA_SLOT,
        &format!(
            r#"<script id="initial-data" type="application/json">{}</script>"#,
            snapshot_json
        ),
    );

    Html(updated_html).into_response()
}

/// Serves the current display state
pub async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.driver.snapshot()).into_response()
}

/// Serves static assets (CSS, JS, etc.)
pub async fn assets_handler(Path(path): Path<String>) -> Response {
    match DashboardAssets::get(&path) {
        Some(content) => {
            let body = content.data;
            let mime_type = mime_guess::from_path(&path).first_or_octet_stream();

            ([(header::CONTENT_TYPE, mime_type.as_ref())], body).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
