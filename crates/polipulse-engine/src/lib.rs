//! PoliPulse Engine - import orchestration
//!
//! Coordinates the pure pieces in `polipulse-core` with a `RecordStore`:
//! - `resolver`: the batched duplicate lookup
//! - `executor`: applying insert/update tasks with progress and fail-soft accounting
//! - `session`: the import state machine driven by the command surface
//! - `policy_list`: the caller's in-memory list, refreshed after a run
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging (`log_op_start!`, `log_op_end!`,
//! `log_op_error!`). Core and store use only `tracing::debug!()`.

pub mod executor;
pub mod policy_list;
pub mod progress;
pub mod resolver;
pub mod session;

pub use executor::ImportExecutor;
pub use policy_list::PolicyList;
pub use progress::{NoopProgress, ProgressObserver, RecordingProgress};
pub use resolver::find_duplicates;
pub use session::{ImportSession, ImportStage, RunGuard, RunLock};
