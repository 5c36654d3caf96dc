//! Log Ingestion Error Types

use status_codec::CodecError;
use thiserror::Error;

/// Errors that can occur while configuring ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    /// Extractor rejected its signal code or divisor
    #[error("status codec: {0}")]
    Codec(#[from] CodecError),

    /// Dual-signal mode configured with the same code twice
    #[error("dual-signal mode requires two distinct signal codes, got `{code}` twice")]
    DuplicateSignalCodes { code: String },
}
