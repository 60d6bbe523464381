//! Watch command implementation

use crate::cli::output::format_board;
use crate::cli::{load_config, WatchArgs};
use crate::cycle::CycleDriver;
use crate::dashboard::types::{Snapshot, UpdateType, WebSocketUpdate};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

/// Follow cycle completions until `max_cycles` boards were shown or the driver stops.
///
/// Returns the number of boards passed to `show`.
pub async fn follow_cycles<F>(
    driver: Arc<CycleDriver>,
    mut updates: broadcast::Receiver<WebSocketUpdate>,
    max_cycles: Option<u64>,
    cancel_token: CancellationToken,
    mut show: F,
) -> u64
where
    F: FnMut(&Snapshot),
{
    let handle = Arc::clone(&driver).start(cancel_token.clone());
    let mut shown = 0;

    loop {
        if max_cycles.is_some_and(|max| shown >= max) {
            break;
        }

        tokio::select! {
            _ = cancel_token.cancelled() => break,
            update = updates.recv() => match update {
                Ok(update) if update.update_type == UpdateType::CycleComplete => {
                    show(&driver.snapshot());
                    shown += 1;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Watch fell behind cycle updates");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    cancel_token.cancel();
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "Cycle driver task failed");
    }
    shown
}

/// Handle `pulseboard watch` command
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    crate::logging::init_tracing(&config.logging, true)?;

    let (tx, rx) = broadcast::channel(64);
    let driver = Arc::new(CycleDriver::from_config(&config)?.with_broadcast(tx));

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let clear = std::io::stdout().is_terminal();
    follow_cycles(driver, rx, args.cycles, cancel_token, |snapshot| {
        if clear {
            print!("\x1B[2J\x1B[H");
        }
        println!("{}\n", format_board(snapshot));
    })
    .await;

    Ok(())
}
