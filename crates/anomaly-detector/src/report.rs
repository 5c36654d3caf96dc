//! Detection Report Types

use serde::{Deserialize, Serialize};

use crate::baseline::DeviceBaseline;

/// One reading with its scoring flags, in series order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedReading {
    /// Measurement time (Unix ms)
    pub timestamp_ms: i64,
    /// Ordinal of the source row in the ingested batch
    pub raw_index: usize,
    /// Primary signal value
    pub value: f64,
    /// Secondary signal value, in dual-signal mode
    pub secondary: Option<f64>,
    /// Forest labeled this reading an outlier
    pub is_model_outlier: bool,
    /// Reading falls outside a baseline corridor
    pub is_statistical_outlier: bool,
    /// Final verdict; set only when both flags agree
    pub is_anomaly: bool,
}

/// One confirmed anomaly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Device the anomaly belongs to
    pub device_id: String,
    /// Measurement time (Unix ms)
    pub timestamp_ms: i64,
    /// Primary signal value
    pub value: f64,
    /// Secondary signal value, in dual-signal mode
    pub secondary: Option<f64>,
    /// Ordinal of the source row in the ingested batch
    pub raw_index: usize,
    /// Corridor flag carried over from the annotated reading
    pub is_statistical_outlier: bool,
    /// Model flag carried over from the annotated reading
    pub is_model_outlier: bool,
}

/// Detection output for one evaluated device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Device the report covers
    pub device_id: String,
    /// Corridor for the primary signal
    pub baseline: DeviceBaseline,
    /// Corridor for the secondary signal, in dual-signal mode
    pub secondary_baseline: Option<DeviceBaseline>,
    /// Every reading with its flags, in input order
    pub series: Vec<AnnotatedReading>,
    /// Readings where both criteria concur
    pub anomalies: Vec<AnomalyRecord>,
}

/// Why a device was excluded from detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Fewer measurements than the sample gate
    TooFewSamples { count: usize, required: usize },
    /// A modeled signal had no variance to score against
    ZeroVariance,
}

/// A device excluded from detection, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDevice {
    /// Device that was excluded
    pub device_id: String,
    /// Why it was excluded
    pub reason: SkipReason,
}

/// Outcome of evaluating one device.
///
/// Keeps "evaluated and clean" distinct from "never evaluated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceOutcome {
    /// Device passed the gates and was scored
    Evaluated(DeviceReport),
    /// Device was excluded before scoring
    Skipped(SkippedDevice),
}

impl DeviceOutcome {
    /// Device this outcome belongs to.
    pub fn device_id(&self) -> &str {
        match self {
            DeviceOutcome::Evaluated(report) => &report.device_id,
            DeviceOutcome::Skipped(skipped) => &skipped.device_id,
        }
    }

    /// Report view, when the device was evaluated.
    pub fn as_report(&self) -> Option<&DeviceReport> {
        match self {
            DeviceOutcome::Evaluated(report) => Some(report),
            DeviceOutcome::Skipped(_) => None,
        }
    }
}
