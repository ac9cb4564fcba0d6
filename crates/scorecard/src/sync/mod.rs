//! Pending-queue synchronization
//!
//! - `coordinator` - batch-then-per-record drain of the pending queue
//! - `guarded_client` - converts client panics into `SyncResult::Failure`
//! - `trigger` - flushes at startup and whenever connectivity comes back

pub mod coordinator;
pub mod guarded_client;
pub mod trigger;

pub use coordinator::{FlushOutcome, FlushReport, SyncCoordinator};
pub use guarded_client::GuardedClient;
pub use trigger::SyncTrigger;
