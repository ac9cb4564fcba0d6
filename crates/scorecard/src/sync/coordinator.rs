//! Pending-queue drain
//!
//! `SyncCoordinator::flush` pushes every queued evaluation to the remote
//! store:
//! 1. Skip if another flush on this coordinator is running
//! 2. Load the queue; stop if empty
//! 3. Send it in batches of `batch_size` with `insert_many`
//! 4. When a batch fails, retry its records one by one with `insert_one`
//! 5. Drop exactly the confirmed-sent records (by `saved_at`) from the queue
//!
//! A remote failure never aborts the drain. Records that were not confirmed
//! stay queued for the next trigger, with no retry limit.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use scorecard_api::{Evaluation, PendingRecord, SavedAt, SyncResult};
use scorecard_core::{Result, SubmissionClient};

use crate::config::SyncConfig;
use crate::storage::PendingQueue;
use crate::sync::GuardedClient;

/// How a flush ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushOutcome {
    /// Another flush was running; this call did nothing.
    AlreadyRunning,
    /// Nothing was queued.
    Empty,
    /// Every queued record was confirmed and the queue was cleared.
    Drained,
    /// Some records were confirmed; the rest remain queued.
    Partial,
    /// Nothing was confirmed; the persisted queue was not touched.
    NoProgress,
}

/// Summary of one flush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub outcome: FlushOutcome,
    /// `insert_many` calls made.
    pub batches: usize,
    /// Batches that fell back to per-record inserts.
    pub batch_failures: usize,
    /// Records confirmed by the remote store.
    pub sent: usize,
    /// Records left in the queue afterwards.
    pub still_pending: usize,
}

impl FlushReport {
    fn idle(outcome: FlushOutcome) -> Self {
        Self {
            outcome,
            batches: 0,
            batch_failures: 0,
            sent: 0,
            still_pending: 0,
        }
    }

    /// True when the flush confirmed at least one record.
    pub fn made_progress(&self) -> bool {
        self.sent > 0
    }
}

/// Clears the in-progress flag when the flush ends, including on early return.
struct FlushGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SyncCoordinator {
    queue: Arc<PendingQueue>,
    client: GuardedClient,
    batch_size: usize,
    in_progress: AtomicBool,
}

impl SyncCoordinator {
    pub fn new(
        queue: Arc<PendingQueue>,
        client: Arc<dyn SubmissionClient>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            queue,
            client: GuardedClient::new(client),
            batch_size: config.effective_batch_size(),
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn queue(&self) -> &Arc<PendingQueue> {
        &self.queue
    }

    pub fn is_flushing(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Drain the pending queue against the remote store.
    ///
    /// Only storage failures are returned as errors. Remote failures leave
    /// records queued and are reported through the returned `FlushReport`.
    #[tracing::instrument(name = "sync.flush", skip(self))]
    pub async fn flush(&self) -> Result<FlushReport> {
        let Some(_guard) = FlushGuard::acquire(&self.in_progress) else {
            debug!("[SyncCoordinator] Flush already in progress, skipping");
            return Ok(FlushReport::idle(FlushOutcome::AlreadyRunning));
        };

        let pending = self.queue.load().await?;
        if pending.is_empty() {
            debug!("[SyncCoordinator] No pending evaluations");
            return Ok(FlushReport::idle(FlushOutcome::Empty));
        }

        info!(
            "[SyncCoordinator] Syncing {} pending evaluations via {}",
            pending.len(),
            self.client.client_name()
        );

        let mut confirmed: HashSet<SavedAt> = HashSet::new();
        let mut batches = 0;
        let mut batch_failures = 0;

        for batch in pending.chunks(self.batch_size) {
            batches += 1;
            if !self.send_batch(batch, &mut confirmed).await {
                batch_failures += 1;
            }
        }

        if confirmed.is_empty() {
            warn!(
                "[SyncCoordinator] No pending evaluation was synced this pass; keeping {} for retry",
                pending.len()
            );
            return Ok(FlushReport {
                outcome: FlushOutcome::NoProgress,
                batches,
                batch_failures,
                sent: 0,
                still_pending: pending.len(),
            });
        }

        let still_pending = self.queue.remove_confirmed(&confirmed).await?;
        let outcome = if still_pending == 0 {
            info!("[SyncCoordinator] All pending evaluations synced");
            FlushOutcome::Drained
        } else {
            info!(
                "[SyncCoordinator] Partial sync: {} sent, {} remain",
                confirmed.len(),
                still_pending
            );
            FlushOutcome::Partial
        };

        Ok(FlushReport {
            outcome,
            batches,
            batch_failures,
            sent: confirmed.len(),
            still_pending,
        })
    }

    /// Send one batch, falling back to per-record inserts. Returns false if
    /// the batch call itself failed.
    async fn send_batch(&self, batch: &[PendingRecord], confirmed: &mut HashSet<SavedAt>) -> bool {
        let payload: Vec<Evaluation> = batch.iter().map(|r| r.wire_payload().clone()).collect();

        match self.client.insert_many(&payload).await {
            SyncResult::Success(_) => {
                confirmed.extend(batch.iter().map(|r| r.saved_at));
                info!("[SyncCoordinator] Batch synced ({})", batch.len());
                true
            }
            SyncResult::Failure(err) => {
                warn!(
                    "[SyncCoordinator] Batch insert failed, retrying one by one: {}",
                    err
                );
                for record in batch {
                    match self.client.insert_one(record.wire_payload()).await {
                        SyncResult::Success(_) => {
                            confirmed.insert(record.saved_at);
                        }
                        SyncResult::Failure(err) => {
                            warn!(
                                saved_at = %record.saved_at,
                                "[SyncCoordinator] Failed to send evaluation for group '{}': {}",
                                record.evaluation.group,
                                err
                            );
                        }
                    }
                }
                false
            }
        }
    }
}
