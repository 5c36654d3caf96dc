//! Event Correlation
//!
//! Groups confirmed anomalies from all devices into time clusters: the
//! earliest unassigned anomaly opens a window and everything inside it
//! joins that cluster. A cluster touching more than one device marks a
//! simultaneous anomaly, which downstream reporting treats as a possible
//! supply-side event rather than a single misbehaving device.

use std::collections::BTreeSet;

use anomaly_detector::AnomalyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Correlation error types
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// Window must cover a positive span
    #[error("correlation window must be positive, got {window_ms}ms")]
    InvalidWindow { window_ms: i64 },
}

/// Correlation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Cluster window in milliseconds
    pub window_ms: i64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { window_ms: 60_000 }
    }
}

impl CorrelationConfig {
    /// Check the window before any data is processed.
    pub fn validate(&self) -> Result<(), CorrelationError> {
        if self.window_ms <= 0 {
            return Err(CorrelationError::InvalidWindow {
                window_ms: self.window_ms,
            });
        }
        Ok(())
    }
}

/// A group of anomalies inside one correlation window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyCluster {
    /// Generated id for downstream reference
    pub cluster_id: Uuid,
    /// Timestamp of the earliest member, which seeds the window
    pub window_start_ms: i64,
    /// Seed timestamp plus the configured window
    pub window_end_ms: i64,
    /// Member anomalies ordered by timestamp
    pub members: Vec<AnomalyRecord>,
}

impl AnomalyCluster {
    /// Distinct devices contributing to this cluster.
    pub fn device_ids(&self) -> BTreeSet<&str> {
        self.members.iter().map(|m| m.device_id.as_str()).collect()
    }

    /// True when anomalies from more than one device coincide.
    pub fn is_simultaneous(&self) -> bool {
        self.device_ids().len() > 1
    }

    /// Milliseconds between the first and last member.
    pub fn span_ms(&self) -> i64 {
        match (self.members.first(), self.members.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0,
        }
    }

    /// Window start as UTC, for reporting.
    pub fn window_start_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.window_start_ms)
    }
}

/// Groups cross-device anomalies into time clusters
#[derive(Debug, Clone)]
pub struct Correlator {
    config: CorrelationConfig,
}

impl Correlator {
    /// Create a correlator, rejecting a non-positive window up front.
    pub fn new(config: CorrelationConfig) -> Result<Self, CorrelationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this correlator runs with.
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Partition anomalies into forward-looking clusters.
    ///
    /// Input is sorted by timestamp (stable, so ties keep their input
    /// order). The earliest unassigned anomaly seeds a cluster that takes
    /// everything up to `window_ms` after it, inclusive; the window never
    /// extends backwards. Each anomaly lands in exactly one cluster.
    pub fn correlate(&self, anomalies: &[AnomalyRecord]) -> Vec<AnomalyCluster> {
        if anomalies.is_empty() {
            return Vec::new();
        }
        let mut ordered = anomalies.to_vec();
        ordered.sort_by_key(|a| a.timestamp_ms);

        let mut clusters = Vec::new();
        let mut index = 0;
        while index < ordered.len() {
            let window_start_ms = ordered[index].timestamp_ms;
            let window_end_ms = window_start_ms.saturating_add(self.config.window_ms);
            let mut members = Vec::new();
            while index < ordered.len() && ordered[index].timestamp_ms <= window_end_ms {
                members.push(ordered[index].clone());
                index += 1;
            }
            clusters.push(AnomalyCluster {
                cluster_id: Uuid::new_v4(),
                window_start_ms,
                window_end_ms,
                members,
            });
        }
        info!(
            anomalies = ordered.len(),
            clusters = clusters.len(),
            "correlated anomaly batch"
        );
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(device: &str, timestamp_ms: i64, raw_index: usize) -> AnomalyRecord {
        AnomalyRecord {
            device_id: device.to_string(),
            timestamp_ms,
            value: 260.0,
            secondary: None,
            raw_index,
            is_statistical_outlier: true,
            is_model_outlier: true,
        }
    }

    fn correlator() -> Correlator {
        Correlator::new(CorrelationConfig::default()).unwrap()
    }

    #[test]
    fn test_anomalies_half_a_window_apart_share_a_cluster() {
        let anomalies = vec![
            record("plug-kitchen", 1_000_000, 0),
            record("fridge", 1_030_000, 1),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 2);
        assert!(clusters[0].is_simultaneous());
    }

    #[test]
    fn test_anomalies_past_the_window_split() {
        let anomalies = vec![
            record("plug-kitchen", 1_000_000, 0),
            record("fridge", 1_090_000, 1),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 1);
        assert_eq!(clusters[1].members.len(), 1);
        assert!(!clusters[0].is_simultaneous());
    }

    #[test]
    fn test_window_end_is_inclusive() {
        let anomalies = vec![record("a", 0, 0), record("b", 60_000, 1)];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 1);

        let anomalies = vec![record("a", 0, 0), record("b", 60_001, 1)];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_windows_are_forward_only() {
        // 100s is within 60s of 50s, but the cluster seeded at 0s closed
        // its window at 60s, so 100s opens a new one.
        let anomalies = vec![
            record("a", 0, 0),
            record("b", 50_000, 1),
            record("c", 100_000, 2),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 2);
        assert_eq!(clusters[1].members.len(), 1);
        assert_eq!(clusters[1].window_start_ms, 100_000);
    }

    #[test]
    fn test_chains_do_not_merge_past_the_seed_window() {
        let anomalies = vec![
            record("a", 0, 0),
            record("b", 40_000, 1),
            record("c", 80_000, 2),
            record("d", 120_000, 3),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members.len(), 2);
        assert_eq!(clusters[1].window_start_ms, 80_000);
        assert_eq!(clusters[1].members.len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let anomalies = vec![
            record("c", 100_000, 2),
            record("a", 0, 0),
            record("b", 30_000, 1),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].window_start_ms, 0);
        assert_eq!(clusters[0].members[0].device_id, "a");
        assert_eq!(clusters[0].members[1].device_id, "b");
    }

    #[test]
    fn test_empty_input_yields_no_clusters() {
        assert!(correlator().correlate(&[]).is_empty());
    }

    #[test]
    fn test_single_device_cluster_is_not_simultaneous() {
        let anomalies = vec![
            record("plug-kitchen", 1_000, 0),
            record("plug-kitchen", 2_000, 1),
        ];
        let clusters = correlator().correlate(&anomalies);
        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].is_simultaneous());
        assert_eq!(clusters[0].span_ms(), 1_000);
    }

    #[test]
    fn test_cluster_ids_are_unique() {
        let anomalies = vec![
            record("a", 0, 0),
            record("b", 100_000, 1),
            record("c", 200_000, 2),
        ];
        let clusters = correlator().correlate(&anomalies);
        let ids: BTreeSet<Uuid> = clusters.iter().map(|c| c.cluster_id).collect();
        assert_eq!(ids.len(), clusters.len());
    }

    #[test]
    fn test_window_start_renders_as_utc() {
        let clusters = correlator().correlate(&[record("a", 1_000_000, 0)]);
        let rendered = clusters[0].window_start_utc().unwrap().to_rfc3339();
        assert!(rendered.starts_with("1970-01-01T00:16:40"));
    }

    #[test]
    fn test_non_positive_window_rejected() {
        assert!(matches!(
            Correlator::new(CorrelationConfig { window_ms: 0 }),
            Err(CorrelationError::InvalidWindow { window_ms: 0 })
        ));
        assert!(matches!(
            Correlator::new(CorrelationConfig { window_ms: -5 }),
            Err(CorrelationError::InvalidWindow { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_every_anomaly_lands_in_exactly_one_cluster(
            timestamps in proptest::collection::vec(-1_000_000i64..1_000_000, 0..40)
        ) {
            let anomalies: Vec<AnomalyRecord> = timestamps
                .iter()
                .enumerate()
                .map(|(i, &t)| record(&format!("device-{}", i % 5), t, i))
                .collect();

            let clusters = correlator().correlate(&anomalies);
            let mut seen: Vec<usize> = clusters
                .iter()
                .flat_map(|c| c.members.iter().map(|m| m.raw_index))
                .collect();
            seen.sort_unstable();

            let mut expected: Vec<usize> = (0..anomalies.len()).collect();
            expected.sort_unstable();
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn test_members_stay_inside_their_window(
            timestamps in proptest::collection::vec(-1_000_000i64..1_000_000, 1..40),
            window_ms in 1i64..120_000
        ) {
            let anomalies: Vec<AnomalyRecord> = timestamps
                .iter()
                .enumerate()
                .map(|(i, &t)| record("device", t, i))
                .collect();

            let correlator = Correlator::new(CorrelationConfig { window_ms }).unwrap();
            for cluster in correlator.correlate(&anomalies) {
                for member in &cluster.members {
                    prop_assert!(member.timestamp_ms >= cluster.window_start_ms);
                    prop_assert!(member.timestamp_ms <= cluster.window_end_ms);
                }
            }
        }
    }
}
