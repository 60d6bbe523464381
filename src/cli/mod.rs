//! CLI module for Pulseboard
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Run the poll loop and serve the HTML dashboard
//! - `check` - Run one cycle and print every target
//! - `watch` - Reprint the board in the terminal after every cycle
//! - `sources` - List configured sources and their endpoint labels
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the dashboard with default config
//! pulseboard serve
//!
//! # One-shot check, suitable for cron
//! pulseboard check --json
//!
//! # Generate shell completions
//! pulseboard completions bash > ~/.bash_completion.d/pulseboard
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod sources;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::PulseboardConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG: &str = "pulseboard.toml";

/// Pulseboard - polling status dashboard
#[derive(Parser, Debug)]
#[command(
    name = "pulseboard",
    version,
    about = "Status dashboard that polls JSON endpoints and renders their data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dashboard server
    Serve(ServeArgs),
    /// Run a single refresh cycle and print the result
    Check(CheckArgs),
    /// Show the dashboard in the terminal
    Watch(WatchArgs),
    /// List configured sources
    Sources(SourcesArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "PULSEBOARD_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "PULSEBOARD_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PULSEBOARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override refresh interval in milliseconds
    #[arg(long, env = "PULSEBOARD_REFRESH_MS")]
    pub refresh_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Stop after this many completed cycles
    #[arg(long)]
    pub cycles: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load, env-override and validate configuration for the one-shot commands.
///
/// A missing file falls back to defaults, as `serve` does.
pub fn load_config(path: &Path) -> Result<PulseboardConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        PulseboardConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        PulseboardConfig::default()
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
