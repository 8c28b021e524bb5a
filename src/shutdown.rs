use anyhow::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

/// Graceful shutdown coordinator for teller
pub struct ShutdownCoordinator {
    shutdown_tx: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl ShutdownCoordinator {
    pub fn new(shutdown_tx: watch::Sender<bool>, worker: JoinHandle<()>) -> Self {
        Self {
            shutdown_tx,
            worker,
        }
    }

    /// Resolve when a shutdown signal arrives
    pub async fn wait_for_signal() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Shutdown signal received");
    }

    /// Perform graceful shutdown operations
    pub async fn shutdown_all_services(self) -> Result<()> {
        info!("Initiating graceful shutdown of all services...");

        // Signal the review worker and wait for it to drain
        let _ = self.shutdown_tx.send(true);
        match timeout(Duration::from_secs(10), self.worker).await {
            Ok(Ok(())) => info!("Review worker drained"),
            Ok(Err(e)) => warn!("Review worker task failed during shutdown: {}", e),
            Err(_) => warn!("Timeout waiting for review worker to drain"),
        }

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}
