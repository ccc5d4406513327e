//! Duplicate resolver: one batched store lookup per import attempt

use std::collections::HashSet;

use polipulse_core::resolution::{lookup_keys, partition};
use polipulse_core::{log_op_end, log_op_error, log_op_start};
use polipulse_core::{CandidateRow, DuplicateSummary, ImportError, RecordStore, Result};

/// Partition `rows` into existing and incoming against the live store
///
/// Issues exactly one `find_by_keys` call for the distinct non-empty keys,
/// or none at all when there are no keys.
///
/// # Errors
///
/// `ImportError::Lookup` when the store query fails.
pub async fn find_duplicates(
    store: &dyn RecordStore,
    rows: &[CandidateRow],
) -> Result<DuplicateSummary> {
    let keys = lookup_keys(rows);
    if keys.is_empty() {
        return Ok(partition(rows, &HashSet::new()));
    }

    log_op_start!("find_duplicates", key_count = keys.len());
    let start = std::time::Instant::now();

    let existing = store.find_by_keys(&keys).await.map_err(|e| {
        let err = ImportError::Lookup {
            reason: e.reason(),
        };
        log_op_error!(
            "find_duplicates",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        err
    })?;

    let existing_keys: HashSet<String> = existing.iter().map(|r| r.key().to_string()).collect();
    let summary = partition(rows, &existing_keys);

    log_op_end!(
        "find_duplicates",
        duration_ms = start.elapsed().as_millis() as u64,
        existing = summary.existing.len(),
        incoming = summary.incoming.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polipulse_core::ops::StoreCall;
    use polipulse_core::{MemoryStore, Policy};

    fn row(index: usize, key: &str) -> CandidateRow {
        CandidateRow::new(
            index,
            Policy {
                policy_no: key.to_string(),
                ..Policy::default()
            },
        )
    }

    #[tokio::test]
    async fn test_no_keys_no_query() {
        let store = MemoryStore::new();
        let summary = find_duplicates(&store, &[]).await.unwrap();
        assert_eq!(summary.total(), 0);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_batched_lookup() {
        let store = MemoryStore::with_policies([Policy {
            policy_no: "B".to_string(),
            ..Policy::default()
        }]);
        let rows = vec![row(0, "A"), row(1, "B"), row(2, "A")];

        let summary = find_duplicates(&store, &rows).await.unwrap();

        assert_eq!(
            store.calls(),
            vec![StoreCall::FindByKeys(vec!["A".to_string(), "B".to_string()])]
        );
        assert_eq!(summary.existing.len(), 1);
        assert_eq!(summary.incoming.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_lookup_error() {
        let store = MemoryStore::new();
        store.fail_lookups("connection refused");

        let err = find_duplicates(&store, &[row(0, "A")]).await.unwrap_err();
        assert_eq!(
            err,
            ImportError::Lookup {
                reason: "connection refused".to_string()
            }
        );
    }
}
