//! Remote call results and what the user is told after submitting.

use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Outcome of one remote call.
///
/// Remote clients never surface a failure any other way: transport errors,
/// rejected requests and caught panics all become `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncResult {
    /// The remote store accepted the call. Carries whatever the server echoed back.
    Success(serde_json::Value),
    Failure(ApiError),
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncResult::Success(_))
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match self {
            SyncResult::Success(_) => None,
            SyncResult::Failure(err) => Some(err),
        }
    }
}

/// What a submission looked like from the user's side.
///
/// Technical errors never reach the user; every queued case promises an
/// automatic sync.
/// flutter_rust_bridge:non_opaque
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserVisibleOutcome {
    /// The remote store confirmed the evaluation.
    Accepted,
    /// No connectivity; saved locally without trying the network.
    QueuedOffline,
    /// The live attempt failed; saved locally.
    QueuedAfterError,
}

impl UserVisibleOutcome {
    pub fn is_queued(self) -> bool {
        !matches!(self, UserVisibleOutcome::Accepted)
    }

    pub fn title(self) -> &'static str {
        match self {
            UserVisibleOutcome::Accepted => "Success!",
            UserVisibleOutcome::QueuedOffline => "Offline",
            UserVisibleOutcome::QueuedAfterError => "Saved locally",
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            UserVisibleOutcome::Accepted => "Evaluation sent successfully.",
            UserVisibleOutcome::QueuedOffline => {
                "No connection. The evaluation was saved on this device and will sync automatically when the network is back."
            }
            UserVisibleOutcome::QueuedAfterError => {
                "Could not reach the server right now. The evaluation was saved on this device and will sync automatically."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_outcomes_promise_auto_sync() {
        for outcome in [
            UserVisibleOutcome::QueuedOffline,
            UserVisibleOutcome::QueuedAfterError,
        ] {
            assert!(outcome.is_queued());
            assert!(outcome.user_message().contains("sync automatically"));
        }
        assert!(!UserVisibleOutcome::Accepted.is_queued());
    }

    #[test]
    fn test_failure_accessor() {
        let failure = SyncResult::Failure(ApiError::Network {
            message: "timeout".to_string(),
        });
        assert!(!failure.is_success());
        assert!(failure.failure().is_some());
        assert!(SyncResult::Success(serde_json::Value::Null).is_success());
    }
}
