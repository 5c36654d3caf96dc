//! Measurement Extraction
//!
//! Pulls one numeric measurement out of a status blob for a configured
//! signal code. Extraction never fails the caller: a blob that cannot be
//! decoded, or that carries no matching event, yields `None`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CodecError;
use crate::event;

/// Fixed-point divisor used by the deciunit producers (2200 -> 220.0 V)
pub const DEFAULT_DIVISOR: f64 = 10.0;

/// One extracted measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Value after fixed-point scaling
    pub value: f64,
    /// Event timestamp (Unix ms) when the producer included one
    pub timestamp_ms: Option<i64>,
}

/// Extracts measurements for one signal code from status blobs.
///
/// The code matches by substring, so `cur_voltage` also catches vendor
/// variants such as `cur_voltage_a`. The first matching event wins.
#[derive(Debug, Clone)]
pub struct MeasurementExtractor {
    signal_code: String,
    divisor: f64,
}

impl MeasurementExtractor {
    /// Create an extractor for a signal code with a fixed-point divisor.
    pub fn new(signal_code: impl Into<String>, divisor: f64) -> Result<Self, CodecError> {
        let signal_code = signal_code.into();
        if signal_code.is_empty() {
            return Err(CodecError::EmptySignalCode);
        }
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(CodecError::InvalidDivisor { divisor });
        }
        Ok(Self {
            signal_code,
            divisor,
        })
    }

    /// Signal code this extractor matches against.
    pub fn signal_code(&self) -> &str {
        &self.signal_code
    }

    /// Extract the first matching measurement from a blob.
    ///
    /// Returns `None` when the blob cannot be decoded, no event code
    /// contains the signal code, or the matched value is not numeric.
    pub fn extract(&self, blob: &str) -> Option<Extraction> {
        let events = match event::decode_events(blob) {
            Ok(events) => events,
            Err(err) => {
                debug!(signal = %self.signal_code, error = %err, "discarding undecodable status blob");
                return None;
            }
        };
        let matched = events.iter().find(|e| e.code.contains(&self.signal_code))?;
        match matched.value.as_f64() {
            Some(raw) if raw.is_finite() => Some(Extraction {
                value: raw / self.divisor,
                timestamp_ms: matched.t,
            }),
            Some(_) => {
                debug!(code = %matched.code, "discarding non-finite value for matched signal");
                None
            }
            None => {
                debug!(code = %matched.code, "discarding non-numeric value for matched signal");
                None
            }
        }
    }
}
