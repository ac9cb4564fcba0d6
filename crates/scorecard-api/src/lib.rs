//! Shared value types for scorecard
//!
//! Everything in this crate crosses the host boundary (mobile shell, CLI,
//! remote store), so the types are plain data with serde support:
//! - `evaluation` - criteria, scores, the raw form and the validated evaluation
//! - `pending` - queued records and their `SavedAt` identity tag
//! - `sync` - per-call remote results and user-visible submission outcomes
//! - `connectivity` - reachability snapshots reported by the host

pub mod connectivity;
pub mod evaluation;
pub mod pending;
pub mod sync;

pub use connectivity::ConnectivityState;
pub use evaluation::{Criterion, Evaluation, EvaluationForm, Score};
pub use pending::{PendingRecord, SavedAt};
pub use sync::{SyncResult, UserVisibleOutcome};

use serde::{Deserialize, Serialize};

/// Structured error types for API operations.
///
/// These errors are designed to cross FFI boundaries (e.g., Rust to Dart)
/// and provide type-safe error handling in frontends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Remote store rejected the request (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl std::fmt::Display) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_json_roundtrip_keeps_variant() {
        let err = ApiError::Remote {
            status: 409,
            message: "duplicate key".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let parsed: ApiError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
        assert_eq!(
            parsed.to_string(),
            "Remote store rejected the request (HTTP 409): duplicate key"
        );
    }
}
