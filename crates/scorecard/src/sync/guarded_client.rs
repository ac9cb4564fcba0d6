//! Fault-catching wrapper around a `SubmissionClient`
//!
//! The engine only ever talks to the remote store through `GuardedClient`.
//! Clients already report errors as `SyncResult::Failure`; this wrapper also
//! turns a panic inside the client into a `Failure`, so one misbehaving call
//! cannot abort a drain or a submission.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::error;

use scorecard_api::{ApiError, Evaluation, SyncResult};
use scorecard_core::SubmissionClient;

pub struct GuardedClient {
    inner: Arc<dyn SubmissionClient>,
}

impl GuardedClient {
    pub fn new(inner: Arc<dyn SubmissionClient>) -> Self {
        Self { inner }
    }

    async fn guard<F>(&self, call: &str, fut: F) -> SyncResult
    where
        F: Future<Output = SyncResult> + Send,
    {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    "[GuardedClient] {}.{} panicked: {}",
                    self.inner.client_name(),
                    call,
                    message
                );
                SyncResult::Failure(ApiError::Internal {
                    message: format!("{} panicked: {}", call, message),
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[async_trait]
impl SubmissionClient for GuardedClient {
    fn client_name(&self) -> &str {
        self.inner.client_name()
    }

    async fn insert_one(&self, record: &Evaluation) -> SyncResult {
        self.guard("insert_one", self.inner.insert_one(record)).await
    }

    async fn insert_many(&self, records: &[Evaluation]) -> SyncResult {
        self.guard("insert_many", self.inner.insert_many(records))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_api::Score;

    struct PanickingClient;

    #[async_trait]
    impl SubmissionClient for PanickingClient {
        fn client_name(&self) -> &str {
            "panicking"
        }

        async fn insert_one(&self, _record: &Evaluation) -> SyncResult {
            panic!("connection pool poisoned");
        }

        async fn insert_many(&self, _records: &[Evaluation]) -> SyncResult {
            SyncResult::Success(serde_json::Value::Null)
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let client = GuardedClient::new(Arc::new(PanickingClient));
        let evaluation = Evaluation::new("G", "3", "Prof", [Score::Good; 5], None);

        match client.insert_one(&evaluation).await {
            SyncResult::Failure(ApiError::Internal { message }) => {
                assert!(message.contains("connection pool poisoned"));
            }
            other => panic!("expected internal failure, got {:?}", other),
        }
        assert!(client.insert_many(&[evaluation]).await.is_success());
    }
}
