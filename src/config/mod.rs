//! Configuration module for Pulseboard
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PULSEBOARD_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use pulseboard::config::PulseboardConfig;
//!
//! let config = PulseboardConfig::default();
//! assert_eq!(config.polling.refresh_interval_ms, 3000);
//!
//! let toml = r#"
//! [polling]
//! refresh_interval_ms = 4000
//!
//! [[sources]]
//! name = "processing"
//! url = "http://localhost:8100/stats"
//! "#;
//! let config: PulseboardConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.polling.refresh_interval_ms, 4000);
//! assert_eq!(config.sources.len(), 1);
//! ```

pub mod error;
pub mod logging;
pub mod polling;
pub mod server;
pub mod source;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use server::ServerConfig;
pub use source::{IndexConfig, SourceConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PulseboardConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Refresh cadence and banner lifetime
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Polled endpoints, in display order
    pub sources: Vec<SourceConfig>,
}

impl PulseboardConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports PULSEBOARD_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("PULSEBOARD_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("PULSEBOARD_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("PULSEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PULSEBOARD_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(refresh) = std::env::var("PULSEBOARD_REFRESH_MS") {
            if let Ok(ms) = refresh.parse() {
                self.polling.refresh_interval_ms = ms;
            }
        }

        self
    }

    /// Validate configuration
    ///
    /// Stops at the first problem; the error names the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.polling.refresh_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.refresh_interval_ms",
                "refresh interval must be non-zero",
            ));
        }
        if self.polling.error_ttl_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.error_ttl_ms",
                "error TTL must be non-zero",
            ));
        }
        if self.polling.request_timeout_seconds == Some(0) {
            return Err(ConfigError::invalid(
                "polling.request_timeout_seconds",
                "timeout must be non-zero; omit it to disable timeouts",
            ));
        }

        let mut seen = HashSet::new();
        for (i, source) in self.sources.iter().enumerate() {
            if source.name.is_empty() {
                return Err(ConfigError::invalid(
                    format!("sources[{}].name", i),
                    "name cannot be empty",
                ));
            }
            if source.url.is_empty() {
                return Err(ConfigError::invalid(
                    format!("sources[{}].url", i),
                    "URL cannot be empty",
                ));
            }
            if let Err(e) = reqwest::Url::parse(&source.url) {
                return Err(ConfigError::invalid(
                    format!("sources[{}].url", i),
                    format!("'{}' is not an absolute URL: {}", source.url, e),
                ));
            }
            if let Some(index) = &source.index {
                if index.fixed.is_some() == index.random_max.is_some() {
                    return Err(ConfigError::invalid(
                        format!("sources[{}].index", i),
                        "set exactly one of 'fixed' or 'random_max'",
                    ));
                }
                if index.param.is_empty() {
                    return Err(ConfigError::invalid(
                        format!("sources[{}].index.param", i),
                        "parameter name cannot be empty",
                    ));
                }
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
        }

        Ok(())
    }
}
