//! Web dashboard module
//!
//! Provides an embedded web dashboard served at `/` that displays:
//! - One table or text block per configured source, with its endpoint label
//! - The self-expiring error list
//! - The last-updated timestamp and refresh interval
//!
//! The page paints from a snapshot embedded at load time, then follows
//! WebSocket updates, falling back to polling `/api/snapshot`.

pub mod handler;
pub mod types;
pub mod websocket;

pub use handler::{assets_handler, dashboard_handler, snapshot_handler};
pub use websocket::websocket_handler;
