//! Local durable storage
//!
//! - `file_store` - `KeyValueStore` backed by one JSON file per key
//! - `memory_store` - in-process `KeyValueStore` for tests and ephemeral hosts
//! - `pending_queue` - the pending-evaluation queue persisted under a single key

pub mod file_store;
pub mod memory_store;
pub mod pending_queue;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use pending_queue::PendingQueue;
