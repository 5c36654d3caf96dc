//! Detection Pipeline
//!
//! End-to-end batch run over collected smart-home telemetry: fetch rows
//! from a log store, normalize them into per-device measurement series,
//! score every device, and correlate confirmed anomalies across devices.
//! The embedding application supplies the store and consumes the report.

mod config;
mod error;
mod pipeline;
mod report;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::DetectionPipeline;
pub use report::{DetectionReport, RunStats};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
