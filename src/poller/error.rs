//! Error types for polling.

use thiserror::Error;

/// Why a poll did not produce a JSON payload.
///
/// Every variant collapses into [`Outcome::Failure`](super::Outcome) downstream;
/// the distinction only matters for logging and metrics labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Request exceeded the configured timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Request never reached the server or no response arrived
    #[error("{0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// Body was not valid JSON
    #[error("invalid JSON: {0}")]
    Parse(String),

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl PollError {
    /// Short label used for the `kind` metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Timeout(_) | PollError::Network(_) => "network",
            PollError::HttpStatus(_) => "http_status",
            PollError::Parse(_) => "parse",
            PollError::Client(_) => "client",
        }
    }
}
