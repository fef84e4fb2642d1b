//! Signal handling for a clean stop.
//!
//! Handles:
//! - SIGINT (Ctrl+C): stop requested by the user
//! - SIGTERM: stop requested by the hosting platform

use std::future::Future;

use tokio::sync::watch;

/// Why the loop was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Interrupt,
    Terminate,
}

/// Watched by the loop; `None` until a stop is requested.
pub type ShutdownRx = watch::Receiver<Option<Stop>>;

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Resolves when either stop signal arrives.
async fn signal_received() -> Stop {
    tokio::select! {
        _ = ctrl_c() => {
            tracing::info!("received Ctrl+C, stopping");
            Stop::Interrupt
        }
        _ = terminate() => {
            tracing::info!("received SIGTERM, stopping");
            Stop::Terminate
        }
    }
}

/// Spawns a task that publishes the result of `signal` once it resolves.
pub fn shutdown_on<F>(signal: F) -> ShutdownRx
where
    F: Future<Output = Stop> + Send + 'static,
{
    let (tx, rx) = watch::channel(None);
    tokio::spawn(async move {
        let stop = signal.await;
        let _ = tx.send(Some(stop));
    });
    rx
}

/// Listens for Ctrl+C and SIGTERM.
pub fn setup_shutdown_handler() -> ShutdownRx {
    shutdown_on(signal_received())
}
