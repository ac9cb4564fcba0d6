//! Scriptable in-memory remote store
//!
//! `FakeSubmissionClient` records every call, keeps the rows it accepted, and
//! fails or panics on demand. Calls can be paused to hold a flush mid-drain.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

use scorecard_api::{ApiError, Evaluation, SyncResult};
use scorecard_core::SubmissionClient;

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    InsertOne(Evaluation),
    InsertMany(Vec<Evaluation>),
}

#[derive(Debug, Clone, Default)]
pub struct FakeBehavior {
    /// Every `insert_many` fails.
    pub fail_batches: bool,
    /// Every `insert_many` panics.
    pub panic_on_batch: bool,
    /// Every `insert_one` panics.
    pub panic_on_one: bool,
    /// Every call fails with a network error.
    pub unreachable: bool,
    /// Rows with one of these group names are rejected, failing any batch that contains them.
    pub rejected_groups: HashSet<String>,
    pub latency: Option<Duration>,
}

pub struct FakeSubmissionClient {
    behavior: Mutex<FakeBehavior>,
    calls: Mutex<Vec<RemoteCall>>,
    rows: Mutex<Vec<Evaluation>>,
    call_count: watch::Sender<usize>,
    paused: watch::Sender<bool>,
}

impl Default for FakeSubmissionClient {
    fn default() -> Self {
        Self::with_behavior(FakeBehavior::default())
    }
}

impl FakeSubmissionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: FakeBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
            rows: Mutex::new(Vec::new()),
            call_count: watch::Sender::new(0),
            paused: watch::Sender::new(false),
        }
    }

    pub fn update_behavior(&self, f: impl FnOnce(&mut FakeBehavior)) {
        f(&mut self.behavior.lock().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Size of each `insert_many` call, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                RemoteCall::InsertMany(rows) => Some(rows.len()),
                RemoteCall::InsertOne(_) => None,
            })
            .collect()
    }

    /// Group names sent through `insert_one`, in order.
    pub fn single_inserts(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                RemoteCall::InsertOne(row) => Some(row.group.clone()),
                RemoteCall::InsertMany(_) => None,
            })
            .collect()
    }

    /// Rows the fake store accepted, in arrival order.
    pub fn accepted_rows(&self) -> Vec<Evaluation> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn accepted_groups(&self) -> Vec<String> {
        self.accepted_rows().into_iter().map(|r| r.group).collect()
    }

    /// Hold every call (after it is recorded) until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Wait until at least `n` calls have been recorded.
    pub async fn wait_for_calls(&self, n: usize) {
        let mut rx = self.call_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    async fn begin(&self, call: RemoteCall) -> FakeBehavior {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
        self.call_count.send_modify(|count| *count += 1);

        let mut paused = self.paused.subscribe();
        let _ = paused.wait_for(|p| !*p).await;

        let behavior = self.behavior.lock().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(latency) = behavior.latency {
            tokio::time::sleep(latency).await;
        }
        behavior
    }

    fn rejection(behavior: &FakeBehavior, rows: &[Evaluation]) -> Option<ApiError> {
        if behavior.unreachable {
            return Some(ApiError::Network {
                message: "connection refused".to_string(),
            });
        }
        rows.iter()
            .find(|row| behavior.rejected_groups.contains(&row.group))
            .map(|row| ApiError::Remote {
                status: 400,
                message: format!("row for group '{}' violates a constraint", row.group),
            })
    }
}

#[async_trait]
impl SubmissionClient for FakeSubmissionClient {
    fn client_name(&self) -> &str {
        "fake"
    }

    async fn insert_one(&self, record: &Evaluation) -> SyncResult {
        let behavior = self.begin(RemoteCall::InsertOne(record.clone())).await;
        if behavior.panic_on_one {
            panic!("fake insert exploded");
        }
        if let Some(err) = Self::rejection(&behavior, std::slice::from_ref(record)) {
            return SyncResult::Failure(err);
        }
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).push(record.clone());
        SyncResult::Success(serde_json::json!([{ "grupo": record.group }]))
    }

    async fn insert_many(&self, records: &[Evaluation]) -> SyncResult {
        let behavior = self.begin(RemoteCall::InsertMany(records.to_vec())).await;
        if behavior.panic_on_batch {
            panic!("fake batch insert exploded");
        }
        if behavior.fail_batches {
            return SyncResult::Failure(ApiError::Remote {
                status: 500,
                message: "batch insert failed".to_string(),
            });
        }
        if let Some(err) = Self::rejection(&behavior, records) {
            return SyncResult::Failure(err);
        }
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).extend(records.iter().cloned());
        SyncResult::Success(serde_json::Value::Array(Vec::new()))
    }
}
