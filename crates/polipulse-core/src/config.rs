//! Import configuration
//!
//! Loading from files and the environment is done by the CLI; this type
//! only carries defaults and range checks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ImportError, Result};

pub const DEFAULT_WORKER_COUNT: usize = 1;
pub const MAX_WORKER_COUNT: usize = 32;
pub const DEFAULT_DATABASE_PATH: &str = ".polipulse/store.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Tasks in flight at once during execution; 1 means strictly sequential
    pub worker_count: usize,
    pub database_path: PathBuf,
    /// `development` or `production`
    pub log_profile: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_profile: "development".to_string(),
        }
    }
}

impl ImportConfig {
    /// # Errors
    ///
    /// `InvalidConfig` when `worker_count` is outside 1..=32 or the log
    /// profile is unknown.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_WORKER_COUNT).contains(&self.worker_count) {
            return Err(ImportError::InvalidConfig {
                reason: format!(
                    "worker_count must be between 1 and {}, got {}",
                    MAX_WORKER_COUNT, self.worker_count
                ),
            });
        }
        self.profile().map(|_| ())
    }

    pub fn profile(&self) -> Result<crate::logging_facility::Profile> {
        self.log_profile.parse()
    }
}
