//! Poller: one HTTP GET per source, resolved to a JSON payload or a failure.
//!
//! The poller never retries; each refresh cycle is an independent attempt.
//! All sources of a cycle are dispatched at once and resolve independently,
//! so a slow or broken endpoint never delays the others.

mod error;
mod source;


pub use error::PollError;
pub use source::{IndexChoice, IndexedUrl, Source, UrlResolver};

use futures::stream::{FuturesUnordered, Stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Result of one poll attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { payload: Value },
    Failure { message: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

impl From<Result<Value, PollError>> for Outcome {
    fn from(result: Result<Value, PollError>) -> Self {
        match result {
            Ok(payload) => Outcome::Success { payload },
            Err(e) => Outcome::Failure {
                message: e.to_string(),
            },
        }
    }
}

/// Outcome plus the URL actually requested.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub url: String,
    pub outcome: Outcome,
    pub latency_ms: u64,
}

/// HTTP poller shared by every source.
#[derive(Debug, Clone)]
pub struct Poller {
    client: reqwest::Client,
    timeout_seconds: Option<u64>,
}

impl Poller {
    /// Create a poller; `timeout_seconds = None` keeps the client default (no timeout).
    pub fn new(timeout_seconds: Option<u64>) -> Result<Self, PollError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PollError::Client(e.to_string()))?;

        Ok(Self::with_client(client, timeout_seconds))
    }

    /// Create a poller around a prebuilt client.
    ///
    /// `timeout_seconds` must match the timeout configured on `client` so that
    /// timeouts are reported as [`PollError::Timeout`].
    pub fn with_client(client: reqwest::Client, timeout_seconds: Option<u64>) -> Self {
        Self {
            client,
            timeout_seconds,
        }
    }

    /// GET `url` and parse the body as JSON.
    pub async fn fetch(&self, url: &str) -> Result<Value, PollError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify_error(e))?;
        serde_json::from_slice(&body).map_err(|e| PollError::Parse(e.to_string()))
    }

    /// Poll one source, resolving its URL fresh for this call.
    pub async fn poll(&self, source: &Source) -> PollReport {
        let url = source.effective_url();
        let start = Instant::now();
        let result = self.fetch(&url).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        metrics::histogram!("pulseboard_poll_duration_seconds",
            "source" => source.name().to_string()
        )
        .record(latency_ms as f64 / 1000.0);

        match &result {
            Ok(_) => {
                metrics::counter!("pulseboard_polls_total",
                    "source" => source.name().to_string(),
                    "outcome" => "success"
                )
                .increment(1);
                tracing::debug!(source = %source.name(), url = %url, latency_ms, "Poll succeeded");
            }
            Err(e) => {
                metrics::counter!("pulseboard_polls_total",
                    "source" => source.name().to_string(),
                    "outcome" => e.kind()
                )
                .increment(1);
                tracing::warn!(source = %source.name(), url = %url, error = %e, "Poll failed");
            }
        }

        PollReport {
            url,
            outcome: result.into(),
            latency_ms,
        }
    }

    /// Dispatch every source at once; items arrive in completion order.
    ///
    /// Each item carries the index of its source in `sources`.
    pub fn poll_each<'a>(
        &'a self,
        sources: &'a [Source],
    ) -> impl Stream<Item = (usize, PollReport)> + 'a {
        sources
            .iter()
            .enumerate()
            .map(move |(i, source)| async move { (i, self.poll(source).await) })
            .collect::<FuturesUnordered<_>>()
    }

    fn classify_error(&self, e: reqwest::Error) -> PollError {
        match self.timeout_seconds {
            Some(secs) if e.is_timeout() => PollError::Timeout(secs),
            _ => PollError::Network(error_chain(&e)),
        }
    }
}

/// Error text followed by each underlying cause, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
