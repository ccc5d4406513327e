//! Duplicate detection and task planning
//!
//! Pure functions over candidate rows and a set of natural keys already
//! present in the store. The store lookup itself lives in the engine.

pub mod duplicates;
pub mod plan;
pub mod policy;

pub use duplicates::{lookup_keys, partition, DuplicateSummary, KeyConflict};
pub use plan::{build_tasks, ImportTask, TaskOperation};
pub use policy::ResolutionPolicy;
