//! Errors raised while reading or checking `pulseboard.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// TOML syntax or type mismatch, with toml's own location info
    #[error("malformed config: {0}")]
    Parse(String),

    /// `field` is a dotted path such as `sources[2].url`
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Two `[[sources]]` share a name, so their display targets would collide
    #[error("source name '{0}' is used more than once")]
    DuplicateSource(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
