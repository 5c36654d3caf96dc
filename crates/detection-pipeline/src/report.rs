//! Run Report Types
//!
//! Everything the reporting collaborator needs from one batch run:
//! per-device series and anomalies, skip notices, correlation clusters,
//! and the run counters. All of it serializes for rendering or shipping.

use anomaly_detector::{DeviceReport, SkippedDevice};
use event_correlation::AnomalyCluster;
use log_ingest::IngestStats;
use serde::{Deserialize, Serialize};

/// Counters for one detection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Devices with at least one parsed measurement
    pub devices_in: usize,
    /// Devices that passed the gates and were scored
    pub devices_evaluated: usize,
    /// Devices excluded before scoring
    pub devices_skipped: usize,
    /// Confirmed anomalies across all devices
    pub anomalies: usize,
    /// Correlation clusters formed
    pub clusters: usize,
    /// Clusters touching more than one device
    pub simultaneous_clusters: usize,
}

/// Full output of one batch detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Normalization counters for the ingested batch
    pub ingest: IngestStats,
    /// Per-device reports, ordered by device id
    pub devices: Vec<DeviceReport>,
    /// Devices excluded from detection, with reasons
    pub skipped: Vec<SkippedDevice>,
    /// Cross-device anomaly clusters
    pub clusters: Vec<AnomalyCluster>,
    /// Run counters
    pub stats: RunStats,
}

impl DetectionReport {
    /// Report for one device, when it was evaluated.
    pub fn device(&self, device_id: &str) -> Option<&DeviceReport> {
        self.devices.iter().find(|r| r.device_id == device_id)
    }

    /// Clusters where more than one device misbehaved at once.
    pub fn simultaneous_clusters(&self) -> impl Iterator<Item = &AnomalyCluster> {
        self.clusters.iter().filter(|c| c.is_simultaneous())
    }
}
