//! Offline-first evaluation submission
//!
//! Evaluations are sent to the remote store when the device is reachable and
//! saved to a durable pending queue otherwise. The queue is drained in batches
//! at startup and whenever connectivity comes back.
//!
//! - `submission` - validate a form and send it or queue it
//! - `storage` - key-value stores and the pending queue
//! - `sync` - flush coordinator and connectivity trigger
//! - `connectivity` - reachability monitors
//! - `engine` - wires the pieces around one shared queue

pub mod config;
pub mod connectivity;
pub mod engine;
pub mod storage;
pub mod submission;
pub mod sync;
#[cfg(not(target_arch = "wasm32"))]
pub mod testing;

pub use config::SyncConfig;
pub use engine::ScorecardEngine;
pub use storage::{FileKeyValueStore, MemoryKeyValueStore, PendingQueue};
pub use submission::SubmissionService;
pub use sync::{FlushOutcome, FlushReport, SyncCoordinator, SyncTrigger};
