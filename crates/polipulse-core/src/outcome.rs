//! Result accounting for one import run

use serde::Serialize;

use crate::errors::ImportError;
use crate::model::PolicyRecord;

/// Message reported when a run has nothing to write
pub const ZERO_WORK_NOTICE: &str = "No rows to import (all duplicates skipped or nothing to insert).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Completed,
    CompletedWithFailures,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::CompletedWithFailures)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::CompletedWithFailures => "completed-with-failures",
        };
        f.write_str(label)
    }
}

/// A task that the store rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub origin_index: usize,
    pub reason: String,
}

impl RowFailure {
    /// Record `err` against the task at `origin_index`
    ///
    /// An `Apply` error carries its own row and store reason; any other
    /// error is reported by its display text.
    pub fn from_error(origin_index: usize, err: ImportError) -> Self {
        match err {
            ImportError::Apply {
                origin_index,
                reason,
            } => Self {
                origin_index,
                reason,
            },
            other => Self {
                origin_index,
                reason: other.to_string(),
            },
        }
    }
}

/// Percentage of `done` out of `total`, rounded half away from zero
///
/// An empty run counts as fully done.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (100.0 * done.min(total) as f64 / total as f64).round();
    pct as u8
}

/// Summary of a finished import run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub inserted: usize,
    pub updated: usize,
    /// Valid rows that produced no task (existing under a non-updating policy)
    pub skipped: usize,
    /// In task order
    pub failures: Vec<RowFailure>,
    pub progress: u8,
    pub status: RunStatus,
    pub total_tasks: usize,
    /// Records re-read from the store after the run
    pub refreshed: Vec<PolicyRecord>,
}

impl ImportOutcome {
    pub fn succeeded(&self) -> usize {
        self.inserted + self.updated
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_zero_work(&self) -> bool {
        self.total_tasks == 0
    }

    /// One-line operator summary
    pub fn summary(&self) -> String {
        if self.is_zero_work() {
            ZERO_WORK_NOTICE.to_string()
        } else if self.failures.is_empty() {
            format!(
                "CSV import completed: {} inserted, {} updated, {} skipped",
                self.inserted, self.updated, self.skipped
            )
        } else {
            format!(
                "Import completed with {} failed rows ({} succeeded)",
                self.failed(),
                self.succeeded()
            )
        }
    }
}
