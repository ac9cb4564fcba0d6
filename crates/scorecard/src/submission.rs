//! Form-facing submission
//!
//! `SubmissionService::submit` validates the form, then either sends the
//! evaluation live or saves it to the pending queue:
//! - not reachable: enqueue without touching the network (`QueuedOffline`)
//! - live insert succeeded: `Accepted`
//! - live insert failed: enqueue (`QueuedAfterError`)

use std::sync::Arc;
use tracing::{info, warn};

use scorecard_api::{ApiError, Evaluation, EvaluationForm, SyncResult, UserVisibleOutcome};
use scorecard_core::{ConnectivityMonitor, SubmissionClient};

use crate::storage::PendingQueue;
use crate::sync::GuardedClient;

pub struct SubmissionService {
    queue: Arc<PendingQueue>,
    client: GuardedClient,
    connectivity: Arc<dyn ConnectivityMonitor>,
}

impl SubmissionService {
    pub fn new(
        queue: Arc<PendingQueue>,
        client: Arc<dyn SubmissionClient>,
        connectivity: Arc<dyn ConnectivityMonitor>,
    ) -> Self {
        Self {
            queue,
            client: GuardedClient::new(client),
            connectivity,
        }
    }

    /// Validate and submit a form.
    ///
    /// Returns `ApiError::Validation` before any I/O when the form is
    /// incomplete, and `ApiError::Storage` when a needed local save failed.
    /// Remote failures are never returned as errors.
    #[tracing::instrument(name = "submission.submit", skip_all)]
    pub async fn submit(
        &self,
        form: &EvaluationForm,
    ) -> std::result::Result<UserVisibleOutcome, ApiError> {
        let evaluation = form.validate()?;
        self.submit_evaluation(evaluation).await
    }

    /// Submit an evaluation that was already validated.
    pub async fn submit_evaluation(
        &self,
        evaluation: Evaluation,
    ) -> std::result::Result<UserVisibleOutcome, ApiError> {
        if !self.connectivity.is_reachable().await {
            info!("[SubmissionService] Offline, saving evaluation locally");
            self.enqueue(evaluation).await?;
            return Ok(UserVisibleOutcome::QueuedOffline);
        }

        match self.client.insert_one(&evaluation).await {
            SyncResult::Success(_) => {
                info!(
                    "[SubmissionService] Evaluation for group '{}' accepted",
                    evaluation.group
                );
                Ok(UserVisibleOutcome::Accepted)
            }
            SyncResult::Failure(err) => {
                warn!(
                    "[SubmissionService] Live submission failed, saving locally: {}",
                    err
                );
                self.enqueue(evaluation).await?;
                Ok(UserVisibleOutcome::QueuedAfterError)
            }
        }
    }

    async fn enqueue(&self, evaluation: Evaluation) -> std::result::Result<(), ApiError> {
        self.queue
            .enqueue(evaluation)
            .await
            .map(|_| ())
            .map_err(|e| ApiError::storage(format!("Failed to save evaluation locally: {}", e)))
    }
}
