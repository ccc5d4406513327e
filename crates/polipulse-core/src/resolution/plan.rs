//! Task planning: which rows become inserts, which become updates

use serde::Serialize;

use super::duplicates::DuplicateSummary;
use super::policy::ResolutionPolicy;
use crate::model::CandidateRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOperation {
    Insert,
    Update,
}

/// One resolved write against the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportTask {
    pub operation: TaskOperation,
    pub row: CandidateRow,
}

impl ImportTask {
    pub fn key(&self) -> &str {
        self.row.key()
    }

    pub fn origin_index(&self) -> usize {
        self.row.origin_index
    }
}

/// Derive the task list for a run
///
/// Every incoming row becomes an insert. Existing rows become updates only
/// under `UpdateExisting`. Tasks are ordered by origin index.
pub fn build_tasks(summary: &DuplicateSummary, policy: ResolutionPolicy) -> Vec<ImportTask> {
    let mut tasks: Vec<ImportTask> = summary
        .incoming
        .iter()
        .map(|row| ImportTask {
            operation: TaskOperation::Insert,
            row: row.clone(),
        })
        .collect();

    if policy.updates_existing() {
        tasks.extend(summary.existing.iter().map(|row| ImportTask {
            operation: TaskOperation::Update,
            row: row.clone(),
        }));
    }

    tasks.sort_by_key(ImportTask::origin_index);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Policy;

    fn summary() -> DuplicateSummary {
        let row = |index: usize, key: &str| {
            CandidateRow::new(
                index,
                Policy {
                    policy_no: key.to_string(),
                    ..Policy::default()
                },
            )
        };
        DuplicateSummary {
            existing: vec![row(1, "OLD")],
            incoming: vec![row(0, "NEW1"), row(2, "NEW2")],
        }
    }

    #[test]
    fn test_insert_only_never_touches_existing() {
        let tasks = build_tasks(&summary(), ResolutionPolicy::InsertOnly);
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.operation == TaskOperation::Insert));
    }

    #[test]
    fn test_skip_duplicates_matches_insert_only() {
        assert_eq!(
            build_tasks(&summary(), ResolutionPolicy::SkipDuplicates),
            build_tasks(&summary(), ResolutionPolicy::InsertOnly)
        );
    }

    #[test]
    fn test_update_existing_interleaves_by_origin() {
        let tasks = build_tasks(&summary(), ResolutionPolicy::UpdateExisting);
        let shape: Vec<(usize, TaskOperation)> = tasks
            .iter()
            .map(|t| (t.origin_index(), t.operation))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, TaskOperation::Insert),
                (1, TaskOperation::Update),
                (2, TaskOperation::Insert),
            ]
        );
    }
}
