//! In-Memory Log Store

use std::sync::Mutex;

use log_ingest::RawLogRow;
use tracing::info;

use crate::{LogStore, StoreError};

/// In-memory log store backed by a mutex-guarded vector
pub struct MemoryLogStore {
    rows: Mutex<Vec<RawLogRow>>,
}

impl MemoryLogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        info!("creating in-memory log store");
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Insert one row.
    pub fn insert(&self, row: RawLogRow) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        rows.push(row);
        Ok(())
    }

    /// Insert a batch of rows, preserving their order.
    pub fn insert_batch(
        &self,
        batch: impl IntoIterator<Item = RawLogRow>,
    ) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        rows.extend(batch);
        Ok(())
    }

    /// Number of rows currently held.
    pub fn row_count(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Drop every row (for testing).
    pub fn clear(&self) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.clear();
        }
    }
}

impl LogStore for MemoryLogStore {
    fn fetch_all(&self) -> Result<Vec<RawLogRow>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(rows.clone())
    }

    fn fetch_device(&self, device_id: &str) -> Result<Vec<RawLogRow>, StoreError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(rows
            .iter()
            .filter(|row| row.device_id == device_id)
            .cloned()
            .collect())
    }
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}
