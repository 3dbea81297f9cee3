//! Signal handling for abandoning a running command.

use tokio::signal::unix::{SignalKind, signal};

/// Creates a future that completes when an interrupt is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C). A handler that cannot be
/// installed is logged and never fires.
pub async fn interrupted() {
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };
    let sigint = async {
        match signal(SignalKind::interrupt()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGINT handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = sigterm => {
            tracing::info!("Received SIGTERM, abandoning");
        }
        _ = sigint => {
            tracing::info!("Received SIGINT, abandoning");
        }
    }
}
