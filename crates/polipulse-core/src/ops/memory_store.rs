//! In-memory record store
//!
//! Keeps records in insertion order and enforces the unique natural key.
//! Individual operations can be made to fail, which the engine tests use to
//! exercise fail-soft execution and lookup errors.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::record_store::{RecordStore, StoreResult};
use crate::errors::{ExError, ExErrorKind};
use crate::model::{Policy, PolicyRecord};

/// One call made against a `MemoryStore`, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FindByKeys(Vec<String>),
    Insert(String),
    Update(String),
    SelectAll,
    SelectByKeys(Vec<String>),
}

#[derive(Debug, Default)]
struct State {
    records: Vec<PolicyRecord>,
    calls: Vec<StoreCall>,
    lookup_failure: Option<ExError>,
    refetch_failure: Option<ExError>,
    write_failures: HashMap<String, ExError>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `policies`, ids assigned in order
    pub fn with_policies(policies: impl IntoIterator<Item = Policy>) -> Self {
        let records = policies
            .into_iter()
            .map(|p| PolicyRecord::new(Uuid::now_v7().to_string(), p.normalized()))
            .collect();
        Self {
            state: Mutex::new(State {
                records,
                ..State::default()
            }),
        }
    }

    /// Make every `find_by_keys` call fail with `message`
    pub fn fail_lookups(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.lookup_failure =
                Some(ExError::new(ExErrorKind::Persistence).with_message(message));
        }
    }

    /// Make every `select_by_keys` call fail with `message`
    pub fn fail_refetch(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.refetch_failure =
                Some(ExError::new(ExErrorKind::Persistence).with_message(message));
        }
    }

    /// Make inserts and updates of `key` fail with `message`
    pub fn fail_writes_for(&self, key: &str, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.write_failures.insert(
                key.to_string(),
                ExError::new(ExErrorKind::Persistence)
                    .with_key(key)
                    .with_message(message),
            );
        }
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    pub fn records(&self) -> Vec<PolicyRecord> {
        self.state
            .lock()
            .map(|s| s.records.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal).with_message("memory store lock poisoned")
        })
    }
}

fn matching(records: &[PolicyRecord], keys: &[String]) -> Vec<PolicyRecord> {
    records
        .iter()
        .filter(|r| keys.iter().any(|k| k == r.key()))
        .cloned()
        .collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_by_keys(&self, keys: &[String]) -> StoreResult<Vec<PolicyRecord>> {
        let mut state = self.lock()?;
        state.calls.push(StoreCall::FindByKeys(keys.to_vec()));
        if let Some(err) = &state.lookup_failure {
            return Err(err.clone().with_op("find_by_keys"));
        }
        Ok(matching(&state.records, keys))
    }

    async fn insert(&self, policy: &Policy) -> StoreResult<PolicyRecord> {
        let policy = policy.normalized();
        let key = policy.key().to_string();
        let mut state = self.lock()?;
        state.calls.push(StoreCall::Insert(key.clone()));

        if let Some(err) = state.write_failures.get(&key) {
            return Err(err.clone().with_op("insert"));
        }
        if state.records.iter().any(|r| r.key() == key) {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("insert")
                .with_key(&key)
                .with_message(format!(
                    "duplicate key value violates unique constraint on policy_no ({})",
                    key
                )));
        }

        let record = PolicyRecord::new(Uuid::now_v7().to_string(), policy);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, key: &str, policy: &Policy) -> StoreResult<PolicyRecord> {
        let key = key.trim();
        let mut state = self.lock()?;
        state.calls.push(StoreCall::Update(key.to_string()));

        if let Some(err) = state.write_failures.get(key) {
            return Err(err.clone().with_op("update"));
        }
        let record = state
            .records
            .iter_mut()
            .find(|r| r.key() == key)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("update")
                    .with_key(key)
                    .with_message(format!("no policy with number {}", key))
            })?;

        record.policy = policy.normalized();
        Ok(record.clone())
    }

    async fn select_all(&self) -> StoreResult<Vec<PolicyRecord>> {
        let mut state = self.lock()?;
        state.calls.push(StoreCall::SelectAll);
        Ok(state.records.clone())
    }

    async fn select_by_keys(&self, keys: &[String]) -> StoreResult<Vec<PolicyRecord>> {
        let mut state = self.lock()?;
        state.calls.push(StoreCall::SelectByKeys(keys.to_vec()));
        if let Some(err) = &state.refetch_failure {
            return Err(err.clone().with_op("select_by_keys"));
        }
        Ok(matching(&state.records, keys))
    }
}
