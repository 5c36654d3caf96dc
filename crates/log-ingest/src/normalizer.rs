//! Row Normalization
//!
//! One pass over a batch: extract the configured signal(s) from every
//! row, attach a timestamp, and drop whatever does not yield a complete
//! measurement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use status_codec::MeasurementExtractor;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::model::{ParsedMeasurement, RawLogRow, SignalMode};

/// Counters for one normalized batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Rows offered to the normalizer
    pub rows_in: usize,
    /// Rows that yielded a measurement
    pub parsed: usize,
    /// Rows dropped for parse, signal, or timestamp reasons
    pub dropped: usize,
}

/// Turns raw rows into parsed measurements for one signal mode
#[derive(Debug, Clone)]
pub struct Normalizer {
    primary: MeasurementExtractor,
    secondary: Option<MeasurementExtractor>,
}

impl Normalizer {
    /// Build a normalizer for a signal mode and fixed-point divisor.
    pub fn new(mode: &SignalMode, divisor: f64) -> Result<Self, IngestError> {
        match mode {
            SignalMode::Single { code } => Ok(Self {
                primary: MeasurementExtractor::new(code.clone(), divisor)?,
                secondary: None,
            }),
            SignalMode::Dual {
                primary_code,
                secondary_code,
            } => {
                if primary_code == secondary_code {
                    return Err(IngestError::DuplicateSignalCodes {
                        code: primary_code.clone(),
                    });
                }
                Ok(Self {
                    primary: MeasurementExtractor::new(primary_code.clone(), divisor)?,
                    secondary: Some(MeasurementExtractor::new(secondary_code.clone(), divisor)?),
                })
            }
        }
    }

    /// Whether this normalizer extracts two signals per row.
    pub fn is_dual(&self) -> bool {
        self.secondary.is_some()
    }

    /// Normalize one row. `raw_index` is the row's ordinal in the batch.
    ///
    /// The measurement timestamp is the matched event's `t`, falling back
    /// to the row's collector timestamp. In dual mode the row must yield
    /// both signals. Anything incomplete is dropped.
    pub fn normalize(&self, row: &RawLogRow, raw_index: usize) -> Option<ParsedMeasurement> {
        let primary = self.primary.extract(&row.status)?;
        let secondary = match &self.secondary {
            Some(extractor) => match extractor.extract(&row.status) {
                Some(extraction) => Some(extraction.value),
                None => {
                    debug!(device = %row.device_id, "dropping row missing the secondary signal");
                    return None;
                }
            },
            None => None,
        };
        let timestamp_ms = match primary.timestamp_ms.or(row.timestamp_hint) {
            Some(ts) => ts,
            None => {
                debug!(device = %row.device_id, "dropping row without any timestamp");
                return None;
            }
        };
        Some(ParsedMeasurement {
            device_id: row.device_id.clone(),
            value: primary.value,
            secondary,
            timestamp_ms,
            raw_index,
        })
    }

    /// Normalize a whole batch, keeping source-row ordinals.
    pub fn normalize_batch(&self, rows: &[RawLogRow]) -> (Vec<ParsedMeasurement>, IngestStats) {
        let mut measurements = Vec::with_capacity(rows.len());
        for (raw_index, row) in rows.iter().enumerate() {
            if let Some(measurement) = self.normalize(row, raw_index) {
                measurements.push(measurement);
            }
        }
        let stats = IngestStats {
            rows_in: rows.len(),
            parsed: measurements.len(),
            dropped: rows.len() - measurements.len(),
        };
        info!(
            rows_in = stats.rows_in,
            parsed = stats.parsed,
            dropped = stats.dropped,
            "normalized log batch"
        );
        (measurements, stats)
    }
}

/// Group measurements by device, preserving batch order within each device.
///
/// The map is ordered by device id, so iteration order is stable across
/// runs regardless of input order.
pub fn partition_by_device(
    measurements: Vec<ParsedMeasurement>,
) -> BTreeMap<String, Vec<ParsedMeasurement>> {
    let mut by_device: BTreeMap<String, Vec<ParsedMeasurement>> = BTreeMap::new();
    for measurement in measurements {
        by_device
            .entry(measurement.device_id.clone())
            .or_default()
            .push(measurement);
    }
    by_device
}
