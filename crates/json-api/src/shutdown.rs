//! Graceful shutdown signal handling

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

use cartapi_app::request_context::CancelHandle;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

/// Wait for SIGINT or SIGTERM, cancel in-flight request contexts, then stop the server.
pub(crate) async fn listen(
    handle: ServerHandle,
    requests: CancelHandle,
) -> Result<(), ShutdownSignalError> {
    wait_for_signal().await?;

    requests.cancel();
    handle.stop_graceful(None);

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<(), ShutdownSignalError> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?;

    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownSignalError::CtrlC)?;
            info!("ctrl_c signal received");
        }
        _ = terminate.recv() => {
            info!("terminate signal received");
        }
    }

    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<(), ShutdownSignalError> {
    signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC)?;
    info!("ctrl_c signal received");

    Ok(())
}
