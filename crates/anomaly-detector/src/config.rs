//! Detector Configuration

use serde::{Deserialize, Serialize};

use crate::error::DetectorError;
use crate::forest::ForestConfig;

/// Contamination preset validated for single-signal runs
pub const SINGLE_SIGNAL_CONTAMINATION: f64 = 0.05;

/// Contamination preset validated for two-signal runs
pub const DUAL_SIGNAL_CONTAMINATION: f64 = 0.01;

/// Configuration for per-device detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Expected fraction of outlier readings, in (0, 0.5]
    pub contamination: f64,
    /// Corridor half-width as a fraction of the device mean, in (0, 1)
    pub corridor_delta: f64,
    /// Fewest measurements a device needs to be evaluated
    pub min_samples: usize,
    /// Isolation forest hyperparameters
    pub forest: ForestConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: SINGLE_SIGNAL_CONTAMINATION,
            corridor_delta: 0.10,
            min_samples: 10,
            forest: ForestConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Check every parameter before any data is processed.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if !self.contamination.is_finite() || self.contamination <= 0.0 || self.contamination > 0.5
        {
            return Err(DetectorError::InvalidContamination {
                value: self.contamination,
            });
        }
        if !self.corridor_delta.is_finite()
            || self.corridor_delta <= 0.0
            || self.corridor_delta >= 1.0
        {
            return Err(DetectorError::InvalidCorridorDelta {
                value: self.corridor_delta,
            });
        }
        if self.min_samples < 2 {
            return Err(DetectorError::InvalidMinSamples {
                value: self.min_samples,
            });
        }
        if self.forest.trees == 0 {
            return Err(DetectorError::InvalidTreeCount);
        }
        if self.forest.max_samples < 2 {
            return Err(DetectorError::InvalidMaxSamples {
                value: self.forest.max_samples,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.contamination, SINGLE_SIGNAL_CONTAMINATION);
        assert_eq!(config.min_samples, 10);
        assert_eq!(config.forest.seed, 42);
    }

    #[test]
    fn test_contamination_bounds() {
        let mut config = DetectorConfig::default();
        config.contamination = 0.0;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidContamination { .. })
        ));
        config.contamination = 0.6;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidContamination { .. })
        ));
        config.contamination = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_corridor_delta_bounds() {
        let mut config = DetectorConfig::default();
        config.corridor_delta = 0.0;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidCorridorDelta { .. })
        ));
        config.corridor_delta = 1.0;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidCorridorDelta { .. })
        ));
    }

    #[test]
    fn test_gate_and_forest_bounds() {
        let mut config = DetectorConfig::default();
        config.min_samples = 1;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidMinSamples { value: 1 })
        ));

        let mut config = DetectorConfig::default();
        config.forest.trees = 0;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidTreeCount)
        ));

        let mut config = DetectorConfig::default();
        config.forest.max_samples = 1;
        assert!(matches!(
            config.validate(),
            Err(DetectorError::InvalidMaxSamples { value: 1 })
        ));
    }
}
