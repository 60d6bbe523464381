//! `[logging]` section: verbosity, output shape and payload tracing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// How log lines are written.
///
/// `pretty` suits a terminal running `serve`; `json` suits log shippers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    /// Case-insensitive; used for `PULSEBOARD_LOG_FORMAT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(format!("unknown log format '{}', expected pretty or json", s))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base filter level, e.g. `info`. `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
    /// Per-module overrides keyed by module name under `pulseboard::`,
    /// e.g. `poller = "debug"` to trace every request without the noise of `api`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
    /// Emit each successful response body as a `Received data` debug event.
    pub log_payloads: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
            log_payloads: false,
        }
    }
}
