//! Sync engine configuration

use serde::{Deserialize, Serialize};

/// Records per `insert_many` call. Small enough that one failed call puts
/// only a handful of records on the slow per-record path.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Storage key of the pending queue; matches what the mobile app already wrote.
pub const DEFAULT_QUEUE_KEY: &str = "@avaliacoes_pending";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub batch_size: usize,
    pub queue_key: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
        }
    }
}

impl SyncConfig {
    /// Batch size clamped to at least one record.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"batch_size": 10}"#).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.queue_key, DEFAULT_QUEUE_KEY);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let config = SyncConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_batch_size(), 1);
    }
}
