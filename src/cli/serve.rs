//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::PulseboardConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<PulseboardConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        PulseboardConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        PulseboardConfig::default()
    };

    config = config.with_env_overrides();

    // CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(refresh_ms) = args.refresh_ms {
        config.polling.refresh_interval_ms = refresh_ms;
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    crate::logging::init_tracing(&config.logging, false)?;

    tracing::info!("Starting Pulseboard");
    tracing::debug!(?config, "Loaded configuration");
    if config.sources.is_empty() {
        tracing::warn!("No sources configured; the dashboard will stay empty");
    }

    // 3. Build state (driver, store, banner) and router
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app_state = Arc::new(AppState::new(Arc::new(config))?);
    let app = create_router(Arc::clone(&app_state));

    // 4. Start the refresh loop
    let cancel_token = CancellationToken::new();
    let driver_handle = Arc::clone(&app_state.driver).start(cancel_token.clone());

    // 5. Bind and serve
    tracing::info!(addr = %addr, "Dashboard listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    // 6. Cleanup
    cancel_token.cancel();
    tracing::info!("Waiting for cycle driver to stop");
    driver_handle.await?;

    tracing::info!("Pulseboard stopped");
    Ok(())
}
