//! Ingestion Data Model

use serde::{Deserialize, Serialize};

/// One raw row as stored by the log collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogRow {
    /// Device the sample came from
    pub device_id: String,
    /// Status blob exactly as the device reported it
    pub status: String,
    /// Collector-side receive time (Unix ms), when recorded
    pub timestamp_hint: Option<i64>,
}

impl RawLogRow {
    /// Create a row without a collector timestamp.
    pub fn new(device_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            status: status.into(),
            timestamp_hint: None,
        }
    }

    /// Attach the collector-side receive time.
    pub fn with_timestamp_hint(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_hint = Some(timestamp_ms);
        self
    }
}

/// One clean measurement extracted from a raw row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMeasurement {
    /// Device the measurement belongs to
    pub device_id: String,
    /// Primary signal value after fixed-point scaling
    pub value: f64,
    /// Secondary signal value, present only in dual-signal mode
    pub secondary: Option<f64>,
    /// Measurement time (Unix ms)
    pub timestamp_ms: i64,
    /// Ordinal of the source row in the ingested batch
    pub raw_index: usize,
}

/// Which signal codes a batch run extracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SignalMode {
    /// Model one signal per device
    Single {
        /// Signal code matched by substring
        code: String,
    },
    /// Model two signals per device; rows must carry both
    Dual {
        /// Primary signal code
        primary_code: String,
        /// Secondary signal code
        secondary_code: String,
    },
}

impl SignalMode {
    /// Signal code most producers report voltage under
    pub const DEFAULT_PRIMARY: &'static str = "cur_voltage";
    /// Signal code most producers report current under
    pub const DEFAULT_SECONDARY: &'static str = "cur_current";

    /// Single-signal mode for one code.
    pub fn single(code: impl Into<String>) -> Self {
        SignalMode::Single { code: code.into() }
    }

    /// Dual-signal mode for a primary/secondary pair.
    pub fn dual(primary_code: impl Into<String>, secondary_code: impl Into<String>) -> Self {
        SignalMode::Dual {
            primary_code: primary_code.into(),
            secondary_code: secondary_code.into(),
        }
    }

    /// Code of the primary signal.
    pub fn primary_code(&self) -> &str {
        match self {
            SignalMode::Single { code } => code,
            SignalMode::Dual { primary_code, .. } => primary_code,
        }
    }

    /// Code of the secondary signal, in dual mode.
    pub fn secondary_code(&self) -> Option<&str> {
        match self {
            SignalMode::Single { .. } => None,
            SignalMode::Dual { secondary_code, .. } => Some(secondary_code),
        }
    }

    /// Whether this mode extracts two signals per row.
    pub fn is_dual(&self) -> bool {
        matches!(self, SignalMode::Dual { .. })
    }
}

impl Default for SignalMode {
    fn default() -> Self {
        SignalMode::single(Self::DEFAULT_PRIMARY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_single_voltage() {
        let mode = SignalMode::default();
        assert_eq!(mode.primary_code(), "cur_voltage");
        assert_eq!(mode.secondary_code(), None);
        assert!(!mode.is_dual());
    }

    #[test]
    fn test_dual_mode_accessors() {
        let mode = SignalMode::dual("cur_voltage", "cur_current");
        assert_eq!(mode.primary_code(), "cur_voltage");
        assert_eq!(mode.secondary_code(), Some("cur_current"));
        assert!(mode.is_dual());
    }

    #[test]
    fn test_row_builder() {
        let row = RawLogRow::new("plug-kitchen", "[]").with_timestamp_hint(1_000);
        assert_eq!(row.device_id, "plug-kitchen");
        assert_eq!(row.timestamp_hint, Some(1_000));
    }
}
