//! Pipeline Error Types

use anomaly_detector::DetectorError;
use event_correlation::CorrelationError;
use log_ingest::IngestError;
use log_store::StoreError;
use thiserror::Error;

/// Errors that can stop a detection run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Log store could not deliver the batch
    #[error("log store: {0}")]
    Store(#[from] StoreError),

    /// Signal or divisor configuration rejected
    #[error("ingest configuration: {0}")]
    Ingest(#[from] IngestError),

    /// Detector configuration rejected
    #[error("detector configuration: {0}")]
    Detector(#[from] DetectorError),

    /// Correlation configuration rejected
    #[error("correlation configuration: {0}")]
    Correlation(#[from] CorrelationError),

    /// Configuration file missing or malformed
    #[error("configuration file: {0}")]
    ConfigFile(#[from] config::ConfigError),

    /// A per-device worker task panicked
    #[error("device worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
