//! Structured logging facility for PoliPulse
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use polipulse_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Import runs attach their `run_id` to every boundary event so one run can
//! be followed from lookup through refetch.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
