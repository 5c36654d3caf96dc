//! Log Store Error Types

use thiserror::Error;

/// Errors that can occur during store access
#[derive(Debug, Error)]
pub enum StoreError {
    /// Shared state lock poisoned by a panicked writer
    #[error("store lock error: {0}")]
    Lock(String),
}
