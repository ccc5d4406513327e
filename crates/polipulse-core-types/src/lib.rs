//! Core types shared across PoliPulse facilities
//!
//! This crate provides foundational types used by the error, logging and
//! import facilities:
//!
//! - **Correlation types**: RunId for tying every log line of one import run together
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
