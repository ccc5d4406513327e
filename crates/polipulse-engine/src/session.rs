//! Import state machine
//!
//! ```text
//! idle -> file-selected -> parsed -> previewed -> awaiting-resolution ---+
//!                                        |                               v
//!                                        +-------------------> awaiting-confirmation
//!                                                                        |
//!                                                  completed <- executing <-+
//! ```
//!
//! Every action checks the current stage and fails with
//! `ImportError::InvalidTransition` otherwise. A failed parse or lookup
//! leaves the stage where it was so the operator can retry. Nothing is
//! retried automatically.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use polipulse_core::ingest::CsvDocument;
use polipulse_core::{
    verdict_for, CandidateRow, DuplicateSummary, ImportError, ImportOutcome, Policy, RecordStore,
    ResolutionPolicy, Result, ValidationVerdict,
};
use polipulse_core_types::RunId;
use serde::Serialize;
use tracing::debug;

use crate::executor::ImportExecutor;
use crate::policy_list::PolicyList;
use crate::progress::ProgressObserver;
use crate::resolver::find_duplicates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStage {
    #[default]
    Idle,
    FileSelected,
    Parsed,
    Previewed,
    AwaitingResolution,
    AwaitingConfirmation,
    Executing,
    Completed,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportStage::Idle => "idle",
            ImportStage::FileSelected => "file-selected",
            ImportStage::Parsed => "parsed",
            ImportStage::Previewed => "previewed",
            ImportStage::AwaitingResolution => "awaiting-resolution",
            ImportStage::AwaitingConfirmation => "awaiting-confirmation",
            ImportStage::Executing => "executing",
            ImportStage::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Process-wide guard allowing one executing run at a time
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct RunLock {
    running: Arc<AtomicBool>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock, or `None` if a run is already executing
    pub fn try_acquire(&self) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                running: self.running.clone(),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Held for the duration of a run; releases the lock on drop
#[derive(Debug)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// One operator's import, from file selection to result summary
#[derive(Debug)]
pub struct ImportSession {
    stage: ImportStage,
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    rows: Vec<CandidateRow>,
    /// Parallel to `rows` once previewed
    verdicts: Vec<ValidationVerdict>,
    summary: Option<DuplicateSummary>,
    policy: ResolutionPolicy,
    outcome: Option<ImportOutcome>,
    lock: RunLock,
    worker_count: usize,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new(RunLock::new())
    }
}

impl ImportSession {
    pub fn new(lock: RunLock) -> Self {
        Self {
            stage: ImportStage::Idle,
            file_name: None,
            bytes: None,
            rows: Vec::new(),
            verdicts: Vec::new(),
            summary: None,
            policy: ResolutionPolicy::default(),
            outcome: None,
            lock,
            worker_count: polipulse_core::config::DEFAULT_WORKER_COUNT,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn verdicts(&self) -> &[ValidationVerdict] {
        &self.verdicts
    }

    pub fn summary(&self) -> Option<&DuplicateSummary> {
        self.summary.as_ref()
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    /// Rows whose verdict is valid, in origin order
    pub fn valid_rows(&self) -> Vec<CandidateRow> {
        self.rows
            .iter()
            .zip(&self.verdicts)
            .filter(|(_, verdict)| verdict.is_valid())
            .map(|(row, _)| row.clone())
            .collect()
    }

    /// `(origin_index, reason)` for every invalid row
    pub fn rejections(&self) -> Vec<(usize, String)> {
        self.rows
            .iter()
            .zip(&self.verdicts)
            .filter_map(|(row, verdict)| verdict.reason().map(|r| (row.origin_index, r)))
            .collect()
    }

    /// Select a new file, discarding any previous rows and results
    pub fn select_file(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<()> {
        if self.stage == ImportStage::Executing {
            return Err(self.invalid("select a file"));
        }
        self.reset();
        self.file_name = Some(name.into());
        self.bytes = Some(bytes.into());
        self.transition(ImportStage::FileSelected);
        Ok(())
    }

    /// Parse the selected file into candidate rows
    ///
    /// # Errors
    ///
    /// `ImportError::Parse` on malformed CSV; the stage stays `file-selected`.
    pub fn parse(&mut self) -> Result<usize> {
        match self.stage {
            ImportStage::FileSelected => {}
            ImportStage::Idle => return Err(ImportError::NoFileSelected),
            _ => return Err(self.invalid("parse")),
        }
        let bytes = self.bytes.clone().ok_or(ImportError::NoFileSelected)?;

        let document = CsvDocument::parse(bytes)?;
        self.rows = document.rows().collect();
        self.verdicts.clear();
        self.transition(ImportStage::Parsed);
        Ok(self.rows.len())
    }

    /// Validate every row
    pub fn preview(&mut self) -> Result<&[ValidationVerdict]> {
        if self.stage != ImportStage::Parsed {
            return Err(self.invalid("preview"));
        }
        self.revalidate_all();
        self.transition(ImportStage::Previewed);
        Ok(&self.verdicts)
    }

    /// Replace one row's policy and re-validate it
    ///
    /// Any duplicate summary is discarded and the session returns to
    /// `previewed`, so `prepare` must run again.
    pub fn update_row(&mut self, origin_index: usize, policy: Policy) -> Result<ValidationVerdict> {
        match self.stage {
            ImportStage::Parsed
            | ImportStage::Previewed
            | ImportStage::AwaitingResolution
            | ImportStage::AwaitingConfirmation => {}
            _ => return Err(self.invalid("edit a row")),
        }
        let position = self
            .rows
            .iter()
            .position(|r| r.origin_index == origin_index)
            .ok_or(ImportError::RowNotFound { origin_index })?;

        self.rows[position].policy = policy.normalized();
        if self.verdicts.len() == self.rows.len() {
            self.verdicts[position] = verdict_for(&self.rows[position].policy);
        } else {
            self.revalidate_all();
        }

        self.summary = None;
        self.policy = ResolutionPolicy::default();
        self.transition(ImportStage::Previewed);
        Ok(self.verdicts[position])
    }

    /// Run the duplicate check for the valid rows
    ///
    /// Moves to `awaiting-resolution` when some rows match stored records,
    /// otherwise straight to `awaiting-confirmation` with `insert-only`.
    ///
    /// # Errors
    ///
    /// `ImportError::Lookup` if the store query fails; the stage stays
    /// `previewed`.
    pub async fn prepare(&mut self, store: &dyn RecordStore) -> Result<&DuplicateSummary> {
        if self.stage != ImportStage::Previewed {
            return Err(self.invalid("check duplicates"));
        }
        let summary = find_duplicates(store, &self.valid_rows()).await?;

        if summary.requires_decision() {
            self.transition(ImportStage::AwaitingResolution);
        } else {
            self.policy = ResolutionPolicy::InsertOnly;
            self.transition(ImportStage::AwaitingConfirmation);
        }
        Ok(self.summary.insert(summary))
    }

    pub fn choose_policy(&mut self, policy: ResolutionPolicy) -> Result<()> {
        match self.stage {
            ImportStage::AwaitingResolution | ImportStage::AwaitingConfirmation => {
                self.policy = policy;
                self.transition(ImportStage::AwaitingConfirmation);
                Ok(())
            }
            _ => Err(self.invalid("choose a resolution policy")),
        }
    }

    /// Confirm and execute the import
    ///
    /// On success the rows and verdicts are discarded and the outcome is kept.
    ///
    /// # Errors
    ///
    /// - `RunInProgress` if another session holding the same lock is executing
    /// - `Lookup` if the pre-run lookup fails; the stage returns to
    ///   `awaiting-confirmation`
    pub async fn execute(
        &mut self,
        store: &dyn RecordStore,
        observer: &dyn ProgressObserver,
        list: &mut PolicyList,
    ) -> Result<ImportOutcome> {
        if self.stage != ImportStage::AwaitingConfirmation {
            return Err(self.invalid("execute"));
        }
        let _guard = self.lock.try_acquire().ok_or(ImportError::RunInProgress)?;

        let run_id = RunId::new();
        let rows = self.valid_rows();
        self.transition(ImportStage::Executing);

        let result = ImportExecutor::new(store)
            .with_worker_count(self.worker_count)
            .with_observer(observer)
            .run(&rows, self.policy, list, &run_id)
            .await;

        match result {
            Ok(outcome) => {
                self.rows.clear();
                self.verdicts.clear();
                self.summary = None;
                self.bytes = None;
                self.outcome = Some(outcome.clone());
                self.transition(ImportStage::Completed);
                Ok(outcome)
            }
            Err(err) => {
                self.transition(ImportStage::AwaitingConfirmation);
                Err(err)
            }
        }
    }

    /// Back to idle from any stage
    pub fn clear(&mut self) {
        self.reset();
        self.transition(ImportStage::Idle);
    }

    fn reset(&mut self) {
        self.file_name = None;
        self.bytes = None;
        self.rows.clear();
        self.verdicts.clear();
        self.summary = None;
        self.policy = ResolutionPolicy::default();
        self.outcome = None;
    }

    fn revalidate_all(&mut self) {
        self.verdicts = self.rows.iter().map(|r| verdict_for(&r.policy)).collect();
    }

    fn transition(&mut self, to: ImportStage) {
        debug!(from = %self.stage, to = %to, "import stage changed");
        self.stage = to;
    }

    fn invalid(&self, action: &str) -> ImportError {
        ImportError::InvalidTransition {
            from: self.stage.to_string(),
            action: action.to_string(),
        }
    }
}
