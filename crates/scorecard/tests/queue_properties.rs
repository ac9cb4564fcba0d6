use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use scorecard::config::DEFAULT_QUEUE_KEY;
use scorecard::testing::{FakeBehavior, FakeSubmissionClient, evaluation};
use scorecard::{FlushOutcome, MemoryKeyValueStore, PendingQueue, SyncConfig, SyncCoordinator};

struct FlushRun {
    outcome: FlushOutcome,
    accepted: Vec<String>,
    queued: Vec<String>,
}

fn run_flush(rejected: &[bool], batch_size: usize) -> FlushRun {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let queue = Arc::new(PendingQueue::new(
            Arc::new(MemoryKeyValueStore::new()),
            DEFAULT_QUEUE_KEY,
        ));
        let rejected_groups: HashSet<String> = rejected
            .iter()
            .enumerate()
            .filter(|(_, rejected)| **rejected)
            .map(|(i, _)| format!("G{}", i))
            .collect();
        let client = Arc::new(FakeSubmissionClient::with_behavior(FakeBehavior {
            rejected_groups,
            ..Default::default()
        }));
        let config = SyncConfig {
            batch_size,
            ..Default::default()
        };
        let coordinator = SyncCoordinator::new(queue.clone(), client.clone(), &config);

        for i in 0..rejected.len() {
            queue.enqueue(evaluation(&format!("G{}", i))).await.unwrap();
        }

        let report = coordinator.flush().await.unwrap();
        let queued = queue
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.evaluation.group)
            .collect();

        FlushRun {
            outcome: report.outcome,
            accepted: client.accepted_groups(),
            queued,
        }
    })
}

proptest! {
    #[test]
    fn flush_keeps_exactly_the_rejected_records(
        rejected in prop::collection::vec(any::<bool>(), 0..24),
        batch_size in 1usize..8,
    ) {
        let run = run_flush(&rejected, batch_size);

        let expected_queued: Vec<String> = rejected
            .iter()
            .enumerate()
            .filter(|(_, r)| **r)
            .map(|(i, _)| format!("G{}", i))
            .collect();
        let expected_accepted: Vec<String> = rejected
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(i, _)| format!("G{}", i))
            .collect();

        prop_assert_eq!(&run.queued, &expected_queued);
        prop_assert_eq!(&run.accepted, &expected_accepted);

        let expected_outcome = if rejected.is_empty() {
            FlushOutcome::Empty
        } else if expected_queued.is_empty() {
            FlushOutcome::Drained
        } else if expected_accepted.is_empty() {
            FlushOutcome::NoProgress
        } else {
            FlushOutcome::Partial
        };
        prop_assert_eq!(run.outcome, expected_outcome);
    }
}
