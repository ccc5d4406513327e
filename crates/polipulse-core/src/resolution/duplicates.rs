//! Partition of valid candidate rows against the store's existing keys

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::model::CandidateRow;

/// Distinct, non-empty, trimmed natural keys, sorted
///
/// An empty result means no store lookup is needed.
pub fn lookup_keys(rows: &[CandidateRow]) -> Vec<String> {
    rows.iter()
        .map(CandidateRow::key)
        .filter(|key| !key.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Split rows into those whose key already exists in the store and the rest
///
/// Every row lands in exactly one half; each half keeps origin order.
pub fn partition(rows: &[CandidateRow], existing_keys: &HashSet<String>) -> DuplicateSummary {
    let (existing, incoming) = rows
        .iter()
        .cloned()
        .partition(|row| existing_keys.contains(row.key()));
    DuplicateSummary { existing, incoming }
}

/// Result of the duplicate check for one import attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateSummary {
    /// Rows whose policy number matched a stored record
    pub existing: Vec<CandidateRow>,
    /// Rows with no stored counterpart
    pub incoming: Vec<CandidateRow>,
}

/// A policy number shared by more than one row of the same file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyConflict {
    pub policy_no: String,
    pub origin_indices: Vec<usize>,
}

impl DuplicateSummary {
    /// No operator decision is needed when nothing collides
    pub fn requires_decision(&self) -> bool {
        !self.existing.is_empty()
    }

    pub fn total(&self) -> usize {
        self.existing.len() + self.incoming.len()
    }

    /// Policy numbers repeated within the file itself
    ///
    /// Informational only: repeated rows still each produce their own task.
    pub fn intra_file_conflicts(&self) -> Vec<KeyConflict> {
        let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for row in self.existing.iter().chain(self.incoming.iter()) {
            by_key.entry(row.key()).or_default().push(row.origin_index);
        }
        by_key
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(key, mut indices)| {
                indices.sort_unstable();
                KeyConflict {
                    policy_no: key.to_string(),
                    origin_indices: indices,
                }
            })
            .collect()
    }
}
