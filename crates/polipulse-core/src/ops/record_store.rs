//! Record store port
//!
//! The import pipeline depends only on this trait. `MemoryStore` implements
//! it in this crate; the SQLite implementation lives in `polipulse-store`.

use async_trait::async_trait;

use crate::errors::ExError;
use crate::model::{Policy, PolicyRecord};

pub type StoreResult<T> = std::result::Result<T, ExError>;

/// Keyed CRUD over the policy collection
///
/// Keys are policy numbers. Implementations must reject an insert whose key
/// is already stored with `ExErrorKind::AlreadyExists`, and an update of an
/// unknown key with `ExErrorKind::NotFound`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Batched lookup; keys with no record are simply absent from the result
    async fn find_by_keys(&self, keys: &[String]) -> StoreResult<Vec<PolicyRecord>>;

    async fn insert(&self, policy: &Policy) -> StoreResult<PolicyRecord>;

    /// Replace every attribute of the record stored under `key`
    async fn update(&self, key: &str, policy: &Policy) -> StoreResult<PolicyRecord>;

    async fn select_all(&self) -> StoreResult<Vec<PolicyRecord>>;

    /// Re-read records after an import run
    async fn select_by_keys(&self, keys: &[String]) -> StoreResult<Vec<PolicyRecord>> {
        self.find_by_keys(keys).await
    }
}
