//! Per-Device Detection

use log_ingest::ParsedMeasurement;
use ndarray::Array2;
use tracing::{debug, info};

use crate::baseline::DeviceBaseline;
use crate::config::DetectorConfig;
use crate::error::DetectorError;
use crate::forest::IsolationForest;
use crate::report::{
    AnnotatedReading, AnomalyRecord, DeviceOutcome, DeviceReport, SkipReason, SkippedDevice,
};
use crate::scaler::StandardScaler;

/// Scores one device's measurement series at a time.
///
/// A reading becomes an anomaly only when the forest labels it an outlier
/// AND it violates a baseline corridor; either signal alone is not enough.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Create a detector, rejecting invalid configuration up front.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this detector runs with.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Evaluate one device's series.
    ///
    /// Devices below the sample gate, or whose modeled signal has no
    /// variance, are skipped with a reason rather than scored.
    pub fn detect(&self, device_id: &str, measurements: &[ParsedMeasurement]) -> DeviceOutcome {
        if measurements.len() < self.config.min_samples {
            info!(
                device = device_id,
                count = measurements.len(),
                required = self.config.min_samples,
                "skipping device with too few samples"
            );
            return DeviceOutcome::Skipped(SkippedDevice {
                device_id: device_id.to_string(),
                reason: SkipReason::TooFewSamples {
                    count: measurements.len(),
                    required: self.config.min_samples,
                },
            });
        }

        let primary: Vec<f64> = measurements.iter().map(|m| m.value).collect();
        // Two-signal scoring only when every row carries the secondary
        let secondary: Option<Vec<f64>> = measurements.iter().map(|m| m.secondary).collect();

        let baseline = DeviceBaseline::compute(device_id, &primary, self.config.corridor_delta);
        let secondary_baseline = secondary
            .as_ref()
            .map(|values| DeviceBaseline::compute(device_id, values, self.config.corridor_delta));

        let matrix = build_matrix(&primary, secondary.as_deref());
        let scaled = match StandardScaler::fit(&matrix) {
            Ok(scaler) => scaler.transform(&matrix),
            Err(_) => {
                info!(device = device_id, "skipping device with zero variance");
                return DeviceOutcome::Skipped(SkippedDevice {
                    device_id: device_id.to_string(),
                    reason: SkipReason::ZeroVariance,
                });
            }
        };

        let forest = IsolationForest::fit(&self.config.forest, &scaled);
        let scores = forest.score_samples(&scaled);
        let model_outliers = IsolationForest::label_outliers(&scores, self.config.contamination);

        let mut series = Vec::with_capacity(measurements.len());
        let mut anomalies = Vec::new();
        for (row, measurement) in measurements.iter().enumerate() {
            let is_model_outlier = model_outliers[row];
            let mut is_statistical_outlier = baseline.violates(measurement.value);
            if let (Some(corridor), Some(value)) = (&secondary_baseline, measurement.secondary) {
                is_statistical_outlier = is_statistical_outlier || corridor.violates(value);
            }
            let is_anomaly = is_model_outlier && is_statistical_outlier;

            series.push(AnnotatedReading {
                timestamp_ms: measurement.timestamp_ms,
                raw_index: measurement.raw_index,
                value: measurement.value,
                secondary: measurement.secondary,
                is_model_outlier,
                is_statistical_outlier,
                is_anomaly,
            });
            if is_anomaly {
                anomalies.push(AnomalyRecord {
                    device_id: device_id.to_string(),
                    timestamp_ms: measurement.timestamp_ms,
                    value: measurement.value,
                    secondary: measurement.secondary,
                    raw_index: measurement.raw_index,
                    is_statistical_outlier,
                    is_model_outlier,
                });
            }
        }

        debug!(
            device = device_id,
            readings = series.len(),
            anomalies = anomalies.len(),
            "scored device series"
        );
        DeviceOutcome::Evaluated(DeviceReport {
            device_id: device_id.to_string(),
            baseline,
            secondary_baseline,
            series,
            anomalies,
        })
    }
}

fn build_matrix(primary: &[f64], secondary: Option<&[f64]>) -> Array2<f64> {
    let n = primary.len();
    match secondary {
        Some(values) => {
            let mut matrix = Array2::<f64>::zeros((n, 2));
            for row in 0..n {
                matrix[[row, 0]] = primary[row];
                matrix[[row, 1]] = values[row];
            }
            matrix
        }
        None => {
            let mut matrix = Array2::<f64>::zeros((n, 1));
            for row in 0..n {
                matrix[[row, 0]] = primary[row];
            }
            matrix
        }
    }
}
