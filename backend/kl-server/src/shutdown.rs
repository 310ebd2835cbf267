//! Graceful shutdown on Ctrl+C / SIGTERM.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::watch;

/// Graceful shutdown coordinator.
///
/// The flag is latched, so a shutdown requested before anyone waits (a signal
/// during startup, before the listener is bound) is still observed.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Trigger shutdown (call this from signal handler)
    pub fn shutdown(&self) {
        info!("Shutdown requested, stopping server");
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Resolves once [`shutdown`](Self::shutdown) has been called, including
    /// when that happened before this future was created.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        async move {
            let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
        }
    }

    /// Trigger shutdown when the process receives SIGINT or SIGTERM.
    pub fn listen_for_signals(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(signal) => {
                    info!("Received {signal}, initiating graceful shutdown");
                    coordinator.shutdown();
                }
                Err(e) => error!("Failed to listen for shutdown signals: {e}"),
            }
        });
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT (Ctrl+C)"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
}
