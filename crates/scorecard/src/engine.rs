//! Wiring for hosts
//!
//! `ScorecardEngine` builds the queue, the submission service and the sync
//! coordinator around one shared `PendingQueue`, so every component sees the
//! same queue and the same mutation lock.

use std::sync::Arc;

use scorecard_core::{ConnectivityMonitor, KeyValueStore, SubmissionClient};

use crate::config::SyncConfig;
use crate::storage::PendingQueue;
use crate::submission::SubmissionService;
use crate::sync::{SyncCoordinator, SyncTrigger};

pub struct ScorecardEngine {
    queue: Arc<PendingQueue>,
    submission: SubmissionService,
    coordinator: Arc<SyncCoordinator>,
    connectivity: Arc<dyn ConnectivityMonitor>,
}

impl ScorecardEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        client: Arc<dyn SubmissionClient>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        config: &SyncConfig,
    ) -> Self {
        let queue = Arc::new(PendingQueue::new(store, config.queue_key.clone()));
        let submission =
            SubmissionService::new(queue.clone(), client.clone(), connectivity.clone());
        let coordinator = Arc::new(SyncCoordinator::new(queue.clone(), client, config));

        Self {
            queue,
            submission,
            coordinator,
            connectivity,
        }
    }

    pub fn queue(&self) -> &Arc<PendingQueue> {
        &self.queue
    }

    pub fn submission(&self) -> &SubmissionService {
        &self.submission
    }

    pub fn coordinator(&self) -> &Arc<SyncCoordinator> {
        &self.coordinator
    }

    /// Start flushing at startup and on every return of connectivity.
    pub fn start_sync_trigger(&self) -> SyncTrigger {
        SyncTrigger::spawn(self.coordinator.clone(), self.connectivity.clone())
    }
}
