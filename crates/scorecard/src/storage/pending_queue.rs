//! Pending-evaluation queue
//!
//! The whole queue lives under one key as a JSON array of `PendingRecord`s
//! and is rewritten on every mutation. Mutations are serialized by a lock
//! owned by the queue, so a live submission falling back to `enqueue` while
//! a flush is reconciling cannot drop either side's change.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use scorecard_api::{Evaluation, PendingRecord, SavedAt};
use scorecard_core::{KeyValueStore, Result};

pub struct PendingQueue {
    store: Arc<dyn KeyValueStore>,
    key: String,
    mutation_lock: Mutex<()>,
}

impl PendingQueue {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            mutation_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the queue in insertion order.
    ///
    /// An absent key and an unparseable value both read as an empty queue.
    /// Storage failures are returned.
    pub async fn load(&self) -> Result<Vec<PendingRecord>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<PendingRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(
                    "[PendingQueue] Ignoring unparseable queue under '{}': {}",
                    self.key, e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Read the queue before rewriting it.
    ///
    /// Unlike `load`, an unparseable value is an error so the stored records
    /// are left in place instead of being overwritten.
    async fn load_for_update(&self) -> Result<Vec<PendingRecord>> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str::<Vec<PendingRecord>>(&raw).map_err(|e| {
            error!(
                "[PendingQueue] Refusing to rewrite unparseable queue under '{}': {}",
                self.key, e
            );
            format!(
                "Pending queue under '{}' is unreadable and was left untouched: {}",
                self.key, e
            )
            .into()
        })
    }

    /// Replace the whole queue.
    pub async fn save(&self, records: &[PendingRecord]) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        self.write(records).await
    }

    /// Add an already-tagged record at the end of the queue.
    ///
    /// Fails if a record with the same `saved_at` is already queued.
    pub async fn append(&self, record: PendingRecord) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        let mut records = self.load_for_update().await?;
        if records.iter().any(|r| r.saved_at == record.saved_at) {
            return Err(format!(
                "A pending evaluation saved at {} is already queued",
                record.saved_at
            )
            .into());
        }
        records.push(record);
        self.write(&records).await
    }

    /// Tag an evaluation with a fresh unique `SavedAt` and append it.
    pub async fn enqueue(&self, evaluation: Evaluation) -> Result<PendingRecord> {
        let _guard = self.mutation_lock.lock().await;
        let mut records = self.load_for_update().await?;
        let newest = records.iter().map(|r| r.saved_at).max();
        let record = PendingRecord::new(evaluation, SavedAt::after(newest, Utc::now()));
        records.push(record.clone());
        self.write(&records).await?;

        info!(
            "[PendingQueue] Saved evaluation for group '{}' locally ({} pending)",
            record.evaluation.group,
            records.len()
        );
        Ok(record)
    }

    /// Remove the persisted queue entirely.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.mutation_lock.lock().await;
        self.store.remove_item(&self.key).await
    }

    /// Drop the records whose `saved_at` is in `confirmed` and persist the rest.
    ///
    /// Works on the queue as it is now, so records appended since the caller
    /// last loaded it are kept. Clears the key when nothing remains. Returns
    /// the number of records still pending.
    pub async fn remove_confirmed(&self, confirmed: &HashSet<SavedAt>) -> Result<usize> {
        let _guard = self.mutation_lock.lock().await;
        let mut records = self.load_for_update().await?;
        records.retain(|r| !confirmed.contains(&r.saved_at));

        if records.is_empty() {
            self.store.remove_item(&self.key).await?;
        } else {
            self.write(&records).await?;
        }
        Ok(records.len())
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    async fn write(&self, records: &[PendingRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)
            .map_err(|e| format!("Failed to serialize pending queue: {}", e))?;
        self.store.set_item(&self.key, &raw).await?;
        debug!(
            "[PendingQueue] Persisted {} records under '{}'",
            records.len(),
            self.key
        );
        Ok(())
    }
}
