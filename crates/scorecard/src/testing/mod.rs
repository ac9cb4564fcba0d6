//! Test doubles for the sync pipeline
//!
//! - `FakeSubmissionClient`: in-memory remote store with scriptable failures
//! - `FlakyStore`: key-value store that fails on demand
//! - `evaluation`: a valid evaluation keyed by group name

pub mod fake_client;
pub mod flaky_store;

pub use fake_client::{FakeBehavior, FakeSubmissionClient, RemoteCall};
pub use flaky_store::FlakyStore;

use scorecard_api::{Evaluation, Score};

/// A complete evaluation whose only distinguishing field is `group`.
pub fn evaluation(group: &str) -> Evaluation {
    Evaluation::new(group, "3", "Prof. Silva", [Score::Good; 5], None)
}
