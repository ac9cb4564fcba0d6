//! Seams between the sync engine and the outside world
//!
//! Each trait here is implemented by a collaborator the engine does not own:
//! the device's key-value storage, the remote store, and the platform's
//! network reachability reporting.

use async_trait::async_trait;
use tokio::sync::watch;

use scorecard_api::{ConnectivityState, Evaluation, SyncResult};

// Define Result type using Send + Sync for error
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Durable string storage keyed by name
///
/// Modeled on mobile async key-value storage: a missing key reads as `None`,
/// and `set_item` replaces the whole value. Implementations must make
/// `set_item` atomic: a later `get_item` sees either the old or the new value,
/// never a partial write.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// Insert evaluations into the remote store
///
/// Both calls report through [`SyncResult`] and never return errors any other
/// way. `insert_many` is all-or-nothing: if the remote side stored only part
/// of the batch, the result is still a single `Failure`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SubmissionClient: Send + Sync {
    /// Short name used in logs (e.g., "supabase")
    fn client_name(&self) -> &str;

    async fn insert_one(&self, record: &Evaluation) -> SyncResult;

    async fn insert_many(&self, records: &[Evaluation]) -> SyncResult;
}

/// Network reachability as seen by the device
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ConnectivityMonitor: Send + Sync {
    /// Fresh snapshot of the current state.
    async fn current(&self) -> ConnectivityState;

    /// Receiver that observes every state change after subscription.
    fn subscribe(&self) -> watch::Receiver<ConnectivityState>;

    async fn is_reachable(&self) -> bool {
        self.current().await.is_reachable()
    }
}
