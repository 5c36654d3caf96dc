//! Anomaly Detection
//!
//! Scores one device's measurement series at a time: a statistical
//! corridor around the device mean, an isolation forest over the
//! standardized values, and a final verdict only where both agree.

mod baseline;
mod config;
mod detector;
mod error;
mod forest;
mod report;
mod scaler;

pub use baseline::DeviceBaseline;
pub use config::{DetectorConfig, DUAL_SIGNAL_CONTAMINATION, SINGLE_SIGNAL_CONTAMINATION};
pub use detector::Detector;
pub use error::DetectorError;
pub use forest::{ForestConfig, IsolationForest};
pub use report::{AnnotatedReading, AnomalyRecord, DeviceOutcome, DeviceReport, SkipReason, SkippedDevice};
pub use scaler::StandardScaler;
