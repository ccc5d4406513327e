use serde::{Deserialize, Serialize};

use super::policy::Policy;

/// One parsed CSV data row
///
/// `origin_index` is the row's position among the file's data lines, starting
/// at 0. Empty lines are not counted. It is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub origin_index: usize,
    pub policy: Policy,
}

impl CandidateRow {
    pub fn new(origin_index: usize, policy: Policy) -> Self {
        Self {
            origin_index,
            policy,
        }
    }

    pub fn key(&self) -> &str {
        self.policy.key()
    }
}
