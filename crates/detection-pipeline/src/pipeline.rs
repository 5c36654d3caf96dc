//! Batch Detection Run
//!
//! Ties the crates together for one run: fetch the batch, normalize it,
//! partition by device, score every device on blocking workers, then
//! correlate the union of confirmed anomalies. Per-device scoring shares
//! no state, so the workers need no coordination; correlation waits for
//! all of them.

use anomaly_detector::{AnomalyRecord, Detector, DeviceOutcome};
use event_correlation::Correlator;
use log_ingest::{partition_by_device, Normalizer};
use log_store::LogStore;
use tokio::task::JoinSet;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::report::{DetectionReport, RunStats};

/// Runs the full detection flow over a log store batch
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    normalizer: Normalizer,
    detector: Detector,
    correlator: Correlator,
}

impl DetectionPipeline {
    /// Build a pipeline, rejecting invalid configuration up front.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let normalizer = Normalizer::new(&config.signal, config.divisor)?;
        let detector = Detector::new(config.detector)?;
        let correlator = Correlator::new(config.correlation)?;
        Ok(Self {
            normalizer,
            detector,
            correlator,
        })
    }

    /// Run detection over every row the store holds.
    ///
    /// Devices are scored concurrently on blocking workers; the report
    /// lists them by device id regardless of completion order.
    pub async fn run(&self, store: &dyn LogStore) -> Result<DetectionReport, PipelineError> {
        let rows = store.fetch_all()?;
        let (measurements, ingest) = self.normalizer.normalize_batch(&rows);
        let by_device = partition_by_device(measurements);
        let devices_in = by_device.len();

        let mut workers = JoinSet::new();
        for (device_id, series) in by_device {
            let detector = self.detector.clone();
            workers.spawn_blocking(move || detector.detect(&device_id, &series));
        }
        let mut outcomes = Vec::with_capacity(devices_in);
        while let Some(joined) = workers.join_next().await {
            outcomes.push(joined?);
        }
        // Completion order is nondeterministic; restore device-id order
        outcomes.sort_by(|a, b| a.device_id().cmp(b.device_id()));

        let mut devices = Vec::new();
        let mut skipped = Vec::new();
        let mut all_anomalies: Vec<AnomalyRecord> = Vec::new();
        for outcome in outcomes {
            match outcome {
                DeviceOutcome::Evaluated(report) => {
                    all_anomalies.extend(report.anomalies.iter().cloned());
                    devices.push(report);
                }
                DeviceOutcome::Skipped(notice) => skipped.push(notice),
            }
        }

        let clusters = self.correlator.correlate(&all_anomalies);
        let stats = RunStats {
            devices_in,
            devices_evaluated: devices.len(),
            devices_skipped: skipped.len(),
            anomalies: all_anomalies.len(),
            clusters: clusters.len(),
            simultaneous_clusters: clusters.iter().filter(|c| c.is_simultaneous()).count(),
        };
        info!(
            devices = stats.devices_in,
            evaluated = stats.devices_evaluated,
            skipped = stats.devices_skipped,
            anomalies = stats.anomalies,
            clusters = stats.clusters,
            simultaneous = stats.simultaneous_clusters,
            "detection run complete"
        );
        Ok(DetectionReport {
            ingest,
            devices,
            skipped,
            clusters,
            stats,
        })
    }
}
