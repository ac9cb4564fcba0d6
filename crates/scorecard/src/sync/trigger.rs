//! Connectivity-driven flush trigger
//!
//! Flushes once at startup if the device is reachable, then again each time
//! connectivity goes from unreachable to reachable. A failed flush is logged
//! and the trigger keeps running.

use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use scorecard_core::ConnectivityMonitor;

use super::coordinator::SyncCoordinator;

pub struct SyncTrigger {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SyncTrigger {
    /// Start watching `monitor` on the current tokio runtime.
    pub fn spawn(coordinator: Arc<SyncCoordinator>, monitor: Arc<dyn ConnectivityMonitor>) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        // Subscribe before the startup check so a change during it is not missed.
        let mut changes = monitor.subscribe();

        let handle = tokio::spawn(async move {
            let mut was_reachable = monitor.is_reachable().await;
            info!("[SyncTrigger] Started (reachable: {})", was_reachable);
            if was_reachable {
                run_flush(&coordinator, "startup").await;
            }

            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            info!("[SyncTrigger] Connectivity monitor closed, stopping");
                            break;
                        }
                        let reachable = changes.borrow_and_update().is_reachable();
                        if reachable && !was_reachable {
                            run_flush(&coordinator, "connectivity regained").await;
                        }
                        was_reachable = reachable;
                    }
                    _ = &mut shutdown_rx => {
                        info!("[SyncTrigger] Shutting down");
                        break;
                    }
                }
            }
        });

        Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stop the trigger and wait for an in-flight flush to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("[SyncTrigger] Trigger task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for SyncTrigger {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn run_flush(coordinator: &SyncCoordinator, reason: &str) {
    info!("[SyncTrigger] Flushing pending evaluations ({})", reason);
    match coordinator.flush().await {
        Ok(report) => {
            info!(
                "[SyncTrigger] Flush finished: {:?}, {} sent, {} pending",
                report.outcome, report.sent, report.still_pending
            );
        }
        Err(e) => error!("[SyncTrigger] Flush failed: {}", e),
    }
}
