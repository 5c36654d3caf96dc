//! Log Ingestion
//!
//! Turns raw collector rows into clean per-device measurement series.
//! Rows that fail to decode are dropped and counted, never fatal.

mod error;
mod model;
mod normalizer;

pub use error::IngestError;
pub use model::{ParsedMeasurement, RawLogRow, SignalMode};
pub use normalizer::{partition_by_device, IngestStats, Normalizer};
