#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use polipulse_core::ops::StoreCall;
use polipulse_core::outcome::ZERO_WORK_NOTICE;
use polipulse_core::{ImportError, MemoryStore, ResolutionPolicy, RunStatus};
use polipulse_core_types::RunId;
use polipulse_engine::{ImportExecutor, PolicyList, RecordingProgress};

#[tokio::test]
async fn test_duplicate_keys_in_one_file_one_succeeds_one_fails() {
    let store = MemoryStore::new();
    let rows = common::valid_rows(&["POL1", "POL1"]);
    let mut list = PolicyList::new();

    let outcome = ImportExecutor::new(&store)
        .run(&rows, ResolutionPolicy::InsertOnly, &mut list, &RunId::new())
        .await
        .unwrap();

    assert_eq!(outcome.total_tasks, 2);
    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].origin_index, 1);
    assert!(outcome.failures[0].reason.contains("POL1"));
    assert_eq!(outcome.status, RunStatus::CompletedWithFailures);
    assert_eq!(outcome.progress, 100);
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_100() {
    let store = MemoryStore::new();
    store.fail_writes_for("B", "rejected");
    let rows = common::valid_rows(&["A", "B", "C"]);
    let progress = RecordingProgress::new();

    ImportExecutor::new(&store)
        .with_observer(&progress)
        .run(
            &rows,
            ResolutionPolicy::InsertOnly,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap();

    assert_eq!(progress.percentages(), vec![33, 67, 100]);
}

#[tokio::test]
async fn test_failures_do_not_stop_later_tasks() {
    let store = MemoryStore::new();
    store.fail_writes_for("A", "first row rejected");
    let rows = common::valid_rows(&["A", "B", "C"]);

    let outcome = ImportExecutor::new(&store)
        .run(
            &rows,
            ResolutionPolicy::InsertOnly,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.failed(), outcome.total_tasks - outcome.succeeded());
    assert_eq!(outcome.failures[0].reason, "first row rejected");
    assert_eq!(
        outcome.summary(),
        "Import completed with 1 failed rows (2 succeeded)"
    );
}

#[tokio::test]
async fn test_single_worker_runs_tasks_in_order() {
    let store = MemoryStore::new();
    let rows = common::valid_rows(&["C", "A", "B"]);

    ImportExecutor::new(&store)
        .run(
            &rows,
            ResolutionPolicy::InsertOnly,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap();

    let inserts: Vec<StoreCall> = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Insert(_)))
        .collect();
    assert_eq!(
        inserts,
        vec![
            StoreCall::Insert("C".to_string()),
            StoreCall::Insert("A".to_string()),
            StoreCall::Insert("B".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_update_existing_updates_each_existing_row() {
    let mut stored = common::valid_policy("OLD");
    stored.premium = 100.0;
    let store = MemoryStore::with_policies([stored]);
    let mut list = PolicyList::from_records(store.records());
    let rows = common::valid_rows(&["NEW", "OLD"]);

    let outcome = ImportExecutor::new(&store)
        .run(&rows, ResolutionPolicy::UpdateExisting, &mut list, &RunId::new())
        .await
        .unwrap();

    assert_eq!((outcome.inserted, outcome.updated, outcome.skipped), (1, 1, 0));
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(list.get("OLD").unwrap().policy.premium, 500.0);
    let keys: Vec<&str> = list.records().iter().map(|r| r.key()).collect();
    assert_eq!(keys, vec!["OLD", "NEW"]);
}

#[tokio::test]
async fn test_insert_only_and_skip_leave_existing_untouched() {
    for policy in [ResolutionPolicy::InsertOnly, ResolutionPolicy::SkipDuplicates] {
        let store = MemoryStore::with_policies([common::valid_policy("OLD")]);
        let rows = common::valid_rows(&["OLD", "NEW"]);

        let outcome = ImportExecutor::new(&store)
            .run(&rows, policy, &mut PolicyList::new(), &RunId::new())
            .await
            .unwrap();

        assert_eq!((outcome.inserted, outcome.updated, outcome.skipped), (1, 0, 1));
        assert!(!store
            .calls()
            .iter()
            .any(|c| matches!(c, StoreCall::Update(_))));
    }
}

#[tokio::test]
async fn test_zero_work_makes_no_writes() {
    let store = MemoryStore::with_policies([common::valid_policy("OLD")]);
    let rows = common::valid_rows(&["OLD"]);
    let progress = RecordingProgress::new();

    let outcome = ImportExecutor::new(&store)
        .with_observer(&progress)
        .run(
            &rows,
            ResolutionPolicy::SkipDuplicates,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap();

    assert!(outcome.is_zero_work());
    assert_eq!(outcome.summary(), ZERO_WORK_NOTICE);
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(store.calls(), vec![StoreCall::FindByKeys(vec!["OLD".to_string()])]);
    assert!(progress.percentages().is_empty());
}

#[tokio::test]
async fn test_lookup_failure_aborts_before_any_write() {
    let store = MemoryStore::new();
    store.fail_lookups("store offline");
    let rows = common::valid_rows(&["A"]);

    let err = ImportExecutor::new(&store)
        .run(
            &rows,
            ResolutionPolicy::InsertOnly,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::Lookup { .. }));
    assert_eq!(store.calls().len(), 1);
}

#[tokio::test]
async fn test_refetch_failure_keeps_status_and_list() {
    let store = MemoryStore::new();
    store.fail_refetch("read replica down");
    let mut list = PolicyList::new();

    let outcome = ImportExecutor::new(&store)
        .run(
            &common::valid_rows(&["A"]),
            ResolutionPolicy::InsertOnly,
            &mut list,
            &RunId::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.refreshed.is_empty());
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_parallel_workers_keep_result_order() {
    let store = MemoryStore::new();
    store.fail_writes_for("D", "bad");
    let rows = common::valid_rows(&["A", "B", "C", "D", "E"]);
    let progress = RecordingProgress::new();

    let outcome = ImportExecutor::new(&store)
        .with_worker_count(4)
        .with_observer(&progress)
        .run(
            &rows,
            ResolutionPolicy::InsertOnly,
            &mut PolicyList::new(),
            &RunId::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 4);
    assert_eq!(outcome.failures[0].origin_index, 3);
    assert_eq!(progress.percentages(), vec![20, 40, 60, 80, 100]);
}
