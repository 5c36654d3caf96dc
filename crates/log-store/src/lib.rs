//! Log Store Access
//!
//! The detection engine reads raw rows through the `LogStore` trait so a
//! deployment can back it with whatever holds the collector output. The
//! in-memory implementation here serves tests and embedding applications.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::MemoryLogStore;

use log_ingest::RawLogRow;

/// Batch read access to collected log rows
pub trait LogStore {
    /// Fetch every row in the store, in insertion order.
    fn fetch_all(&self) -> Result<Vec<RawLogRow>, StoreError>;

    /// Fetch every row for one device, in insertion order.
    fn fetch_device(&self, device_id: &str) -> Result<Vec<RawLogRow>, StoreError>;
}
