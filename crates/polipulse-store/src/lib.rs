//! PoliPulse Store - SQLite persistence for imported policies
//!
//! Provides:
//! - Connection management (`db`)
//! - Embedded, checksummed migrations
//! - `SqliteRecordStore`, the `RecordStore` implementation used by the CLI

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteRecordStore;
