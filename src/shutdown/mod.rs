//! Process shutdown.
//!
//! A single root [`CancellationToken`] is cancelled when the process receives
//! Ctrl+C or SIGTERM. The HTTP server stops accepting connections and every
//! request token derived from the root aborts its in-flight provider call.

use tokio::signal;
use tokio_util::sync::CancellationToken;

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

/// Spawn the signal listener and return the root token it cancels.
#[must_use]
pub fn install() -> CancellationToken {
    let root = CancellationToken::new();

    {
        let root = root.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = wait_for_signal() => root.cancel(),
                _ = root.cancelled() => (),
            }
        });
    }

    root
}

/// Resolves once `root` is cancelled; for `with_graceful_shutdown`.
pub async fn on_cancel(root: CancellationToken) {
    root.cancelled_owned().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_child_tokens_follow_root() {
        let root = install();
        let request = root.child_token();

        root.cancel();

        tokio::time::timeout(Duration::from_secs(1), request.cancelled())
            .await
            .unwrap();
        tokio::time::timeout(Duration::from_secs(1), on_cancel(root))
            .await
            .unwrap();
    }
}
