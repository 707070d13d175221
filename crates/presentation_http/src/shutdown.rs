//! Graceful shutdown
//!
//! After a shutdown signal the server stops accepting connections and drains
//! the open ones. The drain is bounded: once the timeout elapses the server
//! future is dropped and the remaining connections are closed.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{signal, sync::Notify, time::sleep};
use tracing::{error, info, warn};

/// How a server run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// All connections finished within the timeout
    Drained,
    /// The timeout elapsed with connections still open
    TimedOut,
}

/// Drive `server` to completion, giving it at most `timeout` after `draining`
/// fires to finish
pub async fn run_with_drain_timeout<F, E>(
    server: F,
    draining: Arc<Notify>,
    timeout: Duration,
) -> Result<DrainOutcome, E>
where
    F: Future<Output = Result<(), E>>,
{
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result.map(|()| DrainOutcome::Drained),
        () = async {
            draining.notified().await;
            info!("Waiting up to {:?} for connections to close", timeout);
            sleep(timeout).await;
        } => {
            warn!(timeout_secs = timeout.as_secs(), "Graceful shutdown timed out, closing remaining connections");
            Ok(DrainOutcome::TimedOut)
        }
    }
}

/// Wait for SIGINT or SIGTERM, then notify `draining`
pub async fn shutdown_signal(draining: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    draining.notify_one();
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[tokio::test]
    async fn finished_server_is_drained() {
        let outcome = run_with_drain_timeout(
            async { Ok::<_, io::Error>(()) },
            Arc::new(Notify::new()),
            Duration::from_secs(30),
        )
        .await
        .unwrap();
        assert_eq!(outcome, DrainOutcome::Drained);
    }

    #[tokio::test]
    async fn stuck_connections_are_cut_after_timeout() {
        let draining = Arc::new(Notify::new());
        draining.notify_one();

        let outcome = run_with_drain_timeout(
            std::future::pending::<Result<(), io::Error>>(),
            draining,
            Duration::from_millis(20),
        )
        .await
        .unwrap();
        assert_eq!(outcome, DrainOutcome::TimedOut);
    }

    #[tokio::test]
    async fn no_timeout_before_shutdown_is_requested() {
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            run_with_drain_timeout(
                std::future::pending::<Result<(), io::Error>>(),
                Arc::new(Notify::new()),
                Duration::from_millis(1),
            ),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_error_is_returned() {
        let err = run_with_drain_timeout(
            async { Err::<(), _>(io::Error::other("accept failed")) },
            Arc::new(Notify::new()),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "accept failed");
    }
}
