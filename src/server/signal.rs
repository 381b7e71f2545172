// Signal handling module
//
// Supported signals:
// - SIGINT:  Stop the server (Ctrl+C)
// - SIGTERM: Stop the server (Unix only)

use crate::logger;

/// Resolve once the process is asked to stop
///
/// If no handler can be installed the future never resolves and the server
/// runs until killed.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            wait_for_ctrl_c().await;
            return;
        }
    };

    let ctrl_c_error = tokio::select! {
        result = tokio::signal::ctrl_c() => result.err(),
        _ = sigterm.recv() => None,
    };

    if let Some(e) = ctrl_c_error {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        sigterm.recv().await;
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
