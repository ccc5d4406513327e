//! PoliPulse Core - bulk policy import kernel
//!
//! This crate holds everything about a CSV policy import that does not need
//! a runtime or a database:
//! - Policy and candidate row models
//! - CSV parsing and the downloadable template
//! - The row validator shared by bulk and single-record paths
//! - Duplicate partition and task planning per resolution policy
//! - The async `RecordStore` port and an in-memory implementation
//! - Error and logging facilities

pub mod config;
pub mod errors;
pub mod ingest;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod outcome;
pub mod resolution;
pub mod rules;

pub use config::ImportConfig;
pub use errors::{ExError, ExErrorKind, ImportError, Result};
pub use model::{CandidateRow, Policy, PolicyRecord};
pub use ops::{MemoryStore, RecordStore};
pub use outcome::{ImportOutcome, RowFailure, RunStatus};
pub use resolution::{DuplicateSummary, ImportTask, ResolutionPolicy, TaskOperation};
pub use rules::{validate, verdict_for, RowRejection, ValidationVerdict};
