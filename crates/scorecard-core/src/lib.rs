//! Core traits for scorecard
//!
//! This crate provides the seams the sync engine is written against:
//! - `KeyValueStore`: durable local storage for the pending queue
//! - `SubmissionClient`: single and batch inserts into the remote store
//! - `ConnectivityMonitor`: reachability snapshots and change notifications

pub mod traits;

pub use traits::{ConnectivityMonitor, KeyValueStore, Result, SubmissionClient};
