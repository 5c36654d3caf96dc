//! Pipeline Configuration
//!
//! One structure nests everything the engine exposes: signal mode,
//! fixed-point divisor, detector parameters, and the correlation window.
//! Validation happens here, before any row is read.

use std::path::Path;

use anomaly_detector::{
    DetectorConfig, DUAL_SIGNAL_CONTAMINATION, SINGLE_SIGNAL_CONTAMINATION,
};
use event_correlation::CorrelationConfig;
use log_ingest::{Normalizer, SignalMode};
use serde::{Deserialize, Serialize};
use status_codec::DEFAULT_DIVISOR;

use crate::error::PipelineError;

/// Configuration for one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Which signal code(s) to extract
    pub signal: SignalMode,
    /// Fixed-point divisor applied to raw event values
    pub divisor: f64,
    /// Per-device detection parameters
    pub detector: DetectorConfig,
    /// Cross-device correlation parameters
    pub correlation: CorrelationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::single_signal()
    }
}

impl PipelineConfig {
    /// Voltage-only preset: one signal, 5% contamination.
    pub fn single_signal() -> Self {
        Self {
            signal: SignalMode::single(SignalMode::DEFAULT_PRIMARY),
            divisor: DEFAULT_DIVISOR,
            detector: DetectorConfig {
                contamination: SINGLE_SIGNAL_CONTAMINATION,
                ..DetectorConfig::default()
            },
            correlation: CorrelationConfig::default(),
        }
    }

    /// Voltage-plus-current preset: two signals, 1% contamination.
    ///
    /// The two historical run modes used different contamination values;
    /// both are kept as presets rather than picking one as correct.
    pub fn dual_signal() -> Self {
        Self {
            signal: SignalMode::dual(SignalMode::DEFAULT_PRIMARY, SignalMode::DEFAULT_SECONDARY),
            divisor: DEFAULT_DIVISOR,
            detector: DetectorConfig {
                contamination: DUAL_SIGNAL_CONTAMINATION,
                ..DetectorConfig::default()
            },
            correlation: CorrelationConfig::default(),
        }
    }

    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let loaded: PipelineConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check every nested parameter before any data is processed.
    pub fn validate(&self) -> Result<(), PipelineError> {
        Normalizer::new(&self.signal, self.divisor)?;
        self.detector.validate()?;
        self.correlation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::single_signal().validate().is_ok());
        assert!(PipelineConfig::dual_signal().validate().is_ok());
    }

    #[test]
    fn test_presets_carry_documented_contamination() {
        assert_eq!(PipelineConfig::single_signal().detector.contamination, 0.05);
        assert_eq!(PipelineConfig::dual_signal().detector.contamination, 0.01);
    }

    #[test]
    fn test_default_surface_matches_spec() {
        let config = PipelineConfig::default();
        assert_eq!(config.signal.primary_code(), "cur_voltage");
        assert_eq!(config.divisor, 10.0);
        assert_eq!(config.detector.corridor_delta, 0.10);
        assert_eq!(config.detector.min_samples, 10);
        assert_eq!(config.correlation.window_ms, 60_000);
    }

    #[test]
    fn test_invalid_nested_values_rejected() {
        let mut config = PipelineConfig::default();
        config.divisor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Ingest(_))
        ));

        let mut config = PipelineConfig::default();
        config.detector.contamination = 2.0;
        assert!(matches!(config.validate(), Err(PipelineError::Detector(_))));

        let mut config = PipelineConfig::default();
        config.correlation.window_ms = -1;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Correlation(_))
        ));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig::dual_signal();
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: PipelineConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_from_file_loads_overrides() {
        let dir = std::env::temp_dir().join("detection-pipeline-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pipeline.json");
        std::fs::write(
            &path,
            r#"{"detector": {"contamination": 0.02}, "correlation": {"window_ms": 30000}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.detector.contamination, 0.02);
        assert_eq!(config.correlation.window_ms, 30_000);
        // Unspecified fields keep their defaults
        assert_eq!(config.signal.primary_code(), "cur_voltage");
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let dir = std::env::temp_dir().join("detection-pipeline-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"correlation": {"window_ms": 0}}"#).unwrap();

        assert!(matches!(
            PipelineConfig::from_file(&path),
            Err(PipelineError::Correlation(_))
        ));
    }
}
