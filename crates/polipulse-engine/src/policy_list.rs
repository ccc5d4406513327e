//! The caller's in-memory list of stored policies

use polipulse_core::PolicyRecord;

/// Ordered list of policy records, unique by natural key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyList {
    records: Vec<PolicyRecord>,
}

impl PolicyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from store output; later records win on key collisions
    pub fn from_records(records: impl IntoIterator<Item = PolicyRecord>) -> Self {
        let mut list = Self::new();
        list.merge(records);
        list
    }

    pub fn records(&self) -> &[PolicyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PolicyRecord> {
        self.records.iter().find(|r| r.key() == key.trim())
    }

    /// Merge by natural key: last write wins, existing keys keep their
    /// position, new keys are appended in arrival order.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = PolicyRecord>) {
        for record in incoming {
            match self.records.iter_mut().find(|r| r.key() == record.key()) {
                Some(slot) => *slot = record,
                None => self.records.push(record),
            }
        }
    }
}
