pub mod memory_store;
pub mod record_store;

pub use memory_store::{MemoryStore, StoreCall};
pub use record_store::RecordStore;
