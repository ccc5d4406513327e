//! Repository layer persisting policies to SQLite

pub mod sqlite_record_store;

pub use sqlite_record_store::SqliteRecordStore;
