use std::collections::HashSet;
use std::sync::Arc;

use scorecard::config::DEFAULT_QUEUE_KEY;
use scorecard::connectivity::ManualConnectivity;
use scorecard::testing::{FakeBehavior, FakeSubmissionClient, FlakyStore};
use scorecard::{MemoryKeyValueStore, PendingQueue, ScorecardEngine, SubmissionService, SyncConfig};
use scorecard_api::{ApiError, ConnectivityState, Criterion, EvaluationForm, Score, UserVisibleOutcome};
use scorecard_core::{KeyValueStore, Result};

fn form(group: &str) -> EvaluationForm {
    let mut form = EvaluationForm {
        evaluator: "Prof. Silva".to_string(),
        class: "2".to_string(),
        group: group.to_string(),
        note: "Good demo".to_string(),
        ..Default::default()
    };
    for criterion in Criterion::ALL {
        form.set_score(criterion, Score::Excellent);
    }
    form
}

struct Harness {
    queue: Arc<PendingQueue>,
    client: Arc<FakeSubmissionClient>,
    connectivity: Arc<ManualConnectivity>,
    service: SubmissionService,
}

fn harness_with(
    store: Arc<dyn KeyValueStore>,
    state: ConnectivityState,
    behavior: FakeBehavior,
) -> Harness {
    let queue = Arc::new(PendingQueue::new(store, DEFAULT_QUEUE_KEY));
    let client = Arc::new(FakeSubmissionClient::with_behavior(behavior));
    let connectivity = Arc::new(ManualConnectivity::new(state));
    let service = SubmissionService::new(queue.clone(), client.clone(), connectivity.clone());
    Harness {
        queue,
        client,
        connectivity,
        service,
    }
}

fn harness(state: ConnectivityState, behavior: FakeBehavior) -> Harness {
    harness_with(Arc::new(MemoryKeyValueStore::new()), state, behavior)
}

#[tokio::test]
async fn test_offline_submission_is_queued_without_network() -> Result<()> {
    let h = harness(ConnectivityState::offline(), FakeBehavior::default());

    let outcome = h.service.submit(&form("Alpha")).await?;
    assert_eq!(outcome, UserVisibleOutcome::QueuedOffline);
    assert!(outcome.is_queued());
    assert!(h.client.calls().is_empty());

    let outcome = h.service.submit(&form("Alpha")).await?;
    assert_eq!(outcome, UserVisibleOutcome::QueuedOffline);

    let records = h.queue.load().await?;
    assert_eq!(records.len(), 2);
    let tags: HashSet<_> = records.iter().map(|r| r.saved_at).collect();
    assert_eq!(tags.len(), 2);
    assert_eq!(records[0].evaluation.total, 5.0);
    assert_eq!(records[0].evaluation.note.as_deref(), Some("Good demo"));
    Ok(())
}

#[tokio::test]
async fn test_attached_network_without_internet_counts_as_offline() -> Result<()> {
    let h = harness(
        ConnectivityState::attached_without_internet(),
        FakeBehavior::default(),
    );

    let outcome = h.service.submit(&form("Alpha")).await?;
    assert_eq!(outcome, UserVisibleOutcome::QueuedOffline);
    assert!(h.client.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_internet_reachability_counts_as_online() -> Result<()> {
    let state = ConnectivityState {
        is_connected: true,
        is_internet_reachable: None,
    };
    let h = harness(state, FakeBehavior::default());

    let outcome = h.service.submit(&form("Alpha")).await?;
    assert_eq!(outcome, UserVisibleOutcome::Accepted);
    Ok(())
}

#[tokio::test]
async fn test_online_submission_is_accepted() -> Result<()> {
    let h = harness(ConnectivityState::online(), FakeBehavior::default());

    let outcome = h.service.submit(&form("Alpha")).await?;

    assert_eq!(outcome, UserVisibleOutcome::Accepted);
    assert_eq!(h.client.single_inserts(), ["Alpha"]);
    assert!(h.queue.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn test_failed_live_submission_is_queued() -> Result<()> {
    let h = harness(
        ConnectivityState::online(),
        FakeBehavior {
            rejected_groups: HashSet::from(["Alpha".to_string()]),
            ..Default::default()
        },
    );

    let outcome = h.service.submit(&form("Alpha")).await?;

    assert_eq!(outcome, UserVisibleOutcome::QueuedAfterError);
    assert_eq!(h.client.single_inserts(), ["Alpha"]);
    let records = h.queue.load().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].evaluation.group, "Alpha");
    Ok(())
}

#[tokio::test]
async fn test_panicking_client_queues_submission() -> Result<()> {
    let h = harness(
        ConnectivityState::online(),
        FakeBehavior {
            panic_on_one: true,
            ..Default::default()
        },
    );

    let outcome = h.service.submit(&form("Alpha")).await?;

    assert_eq!(outcome, UserVisibleOutcome::QueuedAfterError);
    assert_eq!(h.client.single_inserts(), ["Alpha"]);
    assert!(h.client.accepted_rows().is_empty());
    let records = h.queue.load().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].evaluation.group, "Alpha");
    Ok(())
}

#[tokio::test]
async fn test_invalid_form_touches_nothing() -> Result<()> {
    let h = harness(ConnectivityState::online(), FakeBehavior::default());
    let mut incomplete = form("Alpha");
    incomplete.scores[Criterion::Presentation.index()] = None;

    let err = h.service.submit(&incomplete).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "scores"));
    assert!(h.client.calls().is_empty());
    assert!(h.queue.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn test_storage_failure_is_reported() -> Result<()> {
    let store = Arc::new(FlakyStore::new());
    store.fail_writes(true);
    let h = harness_with(
        store,
        ConnectivityState::offline(),
        FakeBehavior::default(),
    );

    let err = h.service.submit(&form("Alpha")).await.unwrap_err();
    assert!(matches!(err, ApiError::Storage { .. }));
    Ok(())
}

#[tokio::test]
async fn test_connectivity_change_switches_path() -> Result<()> {
    let h = harness(ConnectivityState::offline(), FakeBehavior::default());

    assert_eq!(
        h.service.submit(&form("Alpha")).await?,
        UserVisibleOutcome::QueuedOffline
    );
    h.connectivity.set(ConnectivityState::online());
    assert_eq!(
        h.service.submit(&form("Beta")).await?,
        UserVisibleOutcome::Accepted
    );

    assert_eq!(h.client.single_inserts(), ["Beta"]);
    assert_eq!(h.queue.len().await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_engine_queues_offline_and_flushes_later() -> Result<()> {
    let store = Arc::new(MemoryKeyValueStore::new());
    let client = Arc::new(FakeSubmissionClient::new());
    let connectivity = Arc::new(ManualConnectivity::new(ConnectivityState::offline()));
    let engine = ScorecardEngine::new(
        store,
        client.clone(),
        connectivity.clone(),
        &SyncConfig::default(),
    );

    for group in ["A", "B", "C"] {
        engine.submission().submit(&form(group)).await?;
    }
    assert_eq!(engine.queue().len().await?, 3);

    connectivity.set(ConnectivityState::online());
    let report = engine.coordinator().flush().await?;
    assert_eq!(report.sent, 3);
    assert_eq!(client.batch_sizes(), [3]);
    assert!(engine.queue().is_empty().await?);
    Ok(())
}
