//! Anomaly Detector Error Types

use thiserror::Error;

/// Errors that can occur while configuring or preparing detection
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Contamination outside its valid interval
    #[error("contamination must be in (0, 0.5], got {value}")]
    InvalidContamination { value: f64 },

    /// Corridor delta outside its valid interval
    #[error("corridor delta must be in (0, 1), got {value}")]
    InvalidCorridorDelta { value: f64 },

    /// Sample gate too small to compute statistics
    #[error("minimum sample gate must be at least 2, got {value}")]
    InvalidMinSamples { value: usize },

    /// Forest configured without trees
    #[error("forest tree count must be positive")]
    InvalidTreeCount,

    /// Subsample cap too small to split on
    #[error("forest subsample cap must be at least 2, got {value}")]
    InvalidMaxSamples { value: usize },

    /// A column cannot be standardized
    #[error("column {column} has no usable variance")]
    ZeroVariance { column: usize },
}
