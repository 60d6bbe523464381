//! Check command implementation

use crate::cli::output::{format_board, format_board_json};
use crate::cli::{load_config, CheckArgs};
use crate::config::PulseboardConfig;
use crate::cycle::{CycleDriver, CycleSummary};
use crate::dashboard::types::Snapshot;

/// Run exactly one refresh cycle and return the resulting board.
pub async fn check_once(
    config: &PulseboardConfig,
) -> Result<(Snapshot, CycleSummary), Box<dyn std::error::Error>> {
    let driver = CycleDriver::from_config(config)?;
    let summary = driver.run_cycle().await;
    Ok((driver.snapshot(), summary))
}

/// Handle `pulseboard check` command
///
/// Prints the board, then fails if any source failed so the exit code can
/// drive cron jobs and liveness checks.
pub async fn handle_check(args: &CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    crate::logging::init_tracing(&config.logging, true)?;

    let (snapshot, summary) = check_once(&config).await?;

    if args.json {
        println!("{}", format_board_json(&snapshot));
    } else {
        println!("{}", format_board(&snapshot));
    }

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} sources failed: {}",
            summary.failed.len(),
            snapshot.targets.len(),
            summary.failed.join(", ")
        )
        .into())
    }
}
