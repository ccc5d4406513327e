//! Canonical logging macros
//!
//! Every macro stamps `component`, `op` and `event`. Import runs add
//! `run_id` so one run's boundaries can be pulled out of a shared log.

/// Log the start of an operation
///
/// ```
/// # use polipulse_core::log_op_start;
/// # use polipulse_core_types::RunId;
/// let run_id = RunId::new();
/// log_op_start!("find_duplicates", key_count = 3usize);
/// log_op_start!(
///     "execute_import",
///     run_id = run_id.as_str(),
///     row_count = 12usize,
///     policy = "skip-duplicates"
/// );
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// `duration_ms` is required and always comes first.
///
/// ```
/// # use polipulse_core::log_op_end;
/// # use polipulse_core_types::RunId;
/// let run_id = RunId::new();
/// log_op_end!(
///     "execute_import",
///     duration_ms = 42u64,
///     run_id = run_id.as_str(),
///     task_count = 12usize,
///     failed_count = 1usize
/// );
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Takes anything convertible into `ExError` and adds its `err_kind` and
/// `err_code`. A failed import task is logged with the row it came from:
///
/// ```
/// # use polipulse_core::{log_op_error, ImportError};
/// # use polipulse_core_types::RunId;
/// let run_id = RunId::new();
/// let err = ImportError::Apply {
///     origin_index: 3,
///     reason: "disk full".to_string(),
/// };
/// log_op_error!(
///     "apply_task",
///     err,
///     duration_ms = 5u64,
///     run_id = run_id.as_str(),
///     origin_index = 3usize,
///     policy_no = "POL7"
/// );
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = polipulse_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
