//! Startup helpers for the Artlink relay server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::server::{self, AppState};

/// Run the server (used by the `artlink-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Artlink relay v{}", env!("CARGO_PKG_VERSION"));

    let config = match RelayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(serve(config)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if state creation fails.
pub fn initialize(config: RelayConfig) -> RelayResult<Arc<AppState>> {
    tracing::info!(
        model = %config.model,
        port = config.port,
        origins = ?config.allowed_origins,
        static_dir = %config.static_dir.display(),
        max_turns = ?config.max_turns,
        "relay configuration"
    );
    AppState::new(config)
}

async fn serve(config: RelayConfig) -> RelayResult<()> {
    let state = initialize(config)?;
    server::run_server_with_shutdown(state, shutdown_signal()).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
