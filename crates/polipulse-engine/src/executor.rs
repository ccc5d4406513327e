//! Import executor
//!
//! ## Run pipeline (in order):
//! 1. Re-run the duplicate lookup against the live store (LookupError aborts, nothing written)
//! 2. Derive tasks from the fresh existing-set and the chosen policy
//! 3. Empty task list short-circuits with the zero-work notice (no writes, no refetch)
//! 4. Apply tasks through a window of `worker_count` in-flight calls; results are
//!    recorded in task order and a failed task never stops later ones
//! 5. Push progress after every recorded result
//! 6. Refetch every affected key in one call and merge into the caller's list
//!
//! There is no transaction around the batch; each task commits on its own.

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};
use polipulse_core::config::DEFAULT_WORKER_COUNT;
use polipulse_core::outcome::progress_percent;
use polipulse_core::resolution::build_tasks;
use polipulse_core::{log_op_end, log_op_error, log_op_start};
use polipulse_core::{
    CandidateRow, ImportError, ImportOutcome, ImportTask, PolicyRecord, RecordStore,
    ResolutionPolicy, Result, RowFailure, RunStatus, TaskOperation,
};
use polipulse_core_types::RunId;
use tracing::{debug, warn};

use crate::policy_list::PolicyList;
use crate::progress::{NoopProgress, ProgressObserver};
use crate::resolver::find_duplicates;

static NOOP_PROGRESS: NoopProgress = NoopProgress;

/// Applies an import run against a record store
pub struct ImportExecutor<'a> {
    store: &'a dyn RecordStore,
    observer: &'a dyn ProgressObserver,
    worker_count: usize,
}

impl<'a> ImportExecutor<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self {
            store,
            observer: &NOOP_PROGRESS,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }

    /// Maximum tasks in flight; values below 1 are treated as 1
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Execute one import run over the valid rows of a file
    ///
    /// # Errors
    ///
    /// `ImportError::Lookup` if the pre-run duplicate lookup fails. Failures
    /// of individual tasks are reported in the outcome, never as an error.
    pub async fn run(
        &self,
        rows: &[CandidateRow],
        policy: ResolutionPolicy,
        list: &mut PolicyList,
        run_id: &RunId,
    ) -> Result<ImportOutcome> {
        log_op_start!(
            "execute_import",
            run_id = run_id.as_str(),
            row_count = rows.len(),
            policy = policy.as_str()
        );
        let start = std::time::Instant::now();

        let summary = find_duplicates(self.store, rows).await.map_err(|e| {
            log_op_error!(
                "execute_import",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = run_id.as_str()
            );
            e
        })?;

        let tasks = build_tasks(&summary, policy);
        let skipped = if policy.updates_existing() {
            0
        } else {
            summary.existing.len()
        };

        let mut outcome = ImportOutcome {
            skipped,
            total_tasks: tasks.len(),
            status: RunStatus::Pending,
            ..ImportOutcome::default()
        };

        if tasks.is_empty() {
            outcome.progress = 100;
            outcome.status = RunStatus::Completed;
            log_op_end!(
                "execute_import",
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = run_id.as_str(),
                task_count = 0usize,
                failed_count = 0usize
            );
            return Ok(outcome);
        }

        outcome.status = RunStatus::Running;
        self.apply_tasks(&tasks, &mut outcome, run_id).await;

        outcome.refreshed = self.refetch(&tasks, list, run_id).await;
        outcome.status = if outcome.failures.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithFailures
        };

        log_op_end!(
            "execute_import",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            task_count = outcome.total_tasks,
            failed_count = outcome.failures.len()
        );

        Ok(outcome)
    }

    async fn apply_tasks(&self, tasks: &[ImportTask], outcome: &mut ImportOutcome, run_id: &RunId) {
        let total = tasks.len();
        let store = self.store;
        let mut results = stream::iter(tasks)
            .map(|task| async move { (task, apply_task(store, task, run_id).await) })
            .buffered(self.worker_count);

        let mut done = 0;
        while let Some((task, result)) = results.next().await {
            match result {
                Ok(_) => match task.operation {
                    TaskOperation::Insert => outcome.inserted += 1,
                    TaskOperation::Update => outcome.updated += 1,
                },
                Err(err) => outcome
                    .failures
                    .push(RowFailure::from_error(task.origin_index(), err)),
            }

            done += 1;
            outcome.progress = progress_percent(done, total);
            self.observer.on_progress(outcome.progress, done, total);
        }
    }

    /// Re-read affected keys; a failure leaves `list` untouched
    async fn refetch(
        &self,
        tasks: &[ImportTask],
        list: &mut PolicyList,
        run_id: &RunId,
    ) -> Vec<PolicyRecord> {
        let keys: Vec<String> = tasks
            .iter()
            .map(|t| t.key().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        match self.store.select_by_keys(&keys).await {
            Ok(records) => {
                debug!(run_id = run_id.as_str(), count = records.len(), "refetched records");
                list.merge(records.iter().cloned());
                records
            }
            Err(err) => {
                warn!(
                    run_id = run_id.as_str(),
                    err_code = err.code(),
                    reason = err.message(),
                    "refetch after import failed; list left unchanged"
                );
                Vec::new()
            }
        }
    }
}

/// Apply one task; a store error becomes `ImportError::Apply` for that row
async fn apply_task(
    store: &dyn RecordStore,
    task: &ImportTask,
    run_id: &RunId,
) -> Result<PolicyRecord> {
    let start = std::time::Instant::now();
    let policy = task.row.policy.normalized();
    let result = match task.operation {
        TaskOperation::Insert => store.insert(&policy).await,
        TaskOperation::Update => store.update(task.key(), &policy).await,
    };

    result.map_err(|err| {
        let failure = ImportError::Apply {
            origin_index: task.origin_index(),
            reason: err.reason(),
        };
        log_op_error!(
            "apply_task",
            failure.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id.as_str(),
            origin_index = task.origin_index(),
            policy_no = task.key(),
            store_err_code = err.code()
        );
        failure
    })
}
