//! Device Baseline Corridor

use serde::{Deserialize, Serialize};

/// Acceptance corridor around one device's mean reading.
///
/// Recomputed from the device's own batch every run; nothing is carried
/// over between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceBaseline {
    /// Device the corridor belongs to
    pub device_id: String,
    /// Arithmetic mean of the device's values
    pub mean: f64,
    /// `mean * (1 - delta)`
    pub lower_limit: f64,
    /// `mean * (1 + delta)`
    pub upper_limit: f64,
}

impl DeviceBaseline {
    /// Compute the corridor from a non-empty value series.
    pub fn compute(device_id: &str, values: &[f64], corridor_delta: f64) -> Self {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Self {
            device_id: device_id.to_string(),
            mean,
            lower_limit: mean * (1.0 - corridor_delta),
            upper_limit: mean * (1.0 + corridor_delta),
        }
    }

    /// Strict corridor check; readings exactly on a limit are inside.
    pub fn violates(&self, value: f64) -> bool {
        value < self.lower_limit || value > self.upper_limit
    }
}
