//! Session Reports
//!
//! Reduces a [`CompletedRecording`] into one `(elapsed_seconds, degrees)`
//! series per joint, in recording order. Every joint is present in a report,
//! possibly with an empty series.

use super::recording::{CompletedRecording, RecordingMetadata};
use crate::analysis::JointName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Summary statistics for one joint over a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSummary {
    /// Finite samples included in the statistics
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// `max - min`
    pub range_of_motion: f64,
}

impl JointSummary {
    /// Statistics over the finite values of a series, `None` if there are none
    pub fn from_series(series: &[(f64, f64)]) -> Option<Self> {
        let mut samples = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for &(_, degrees) in series.iter().filter(|(_, d)| d.is_finite()) {
            samples += 1;
            min = min.min(degrees);
            max = max.max(degrees);
            sum += degrees;
        }

        (samples > 0).then(|| Self {
            samples,
            min,
            max,
            mean: sum / samples as f64,
            range_of_motion: max - min,
        })
    }
}

/// Read-only per-joint time series of one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    metadata: RecordingMetadata,
    series: BTreeMap<JointName, Vec<(f64, f64)>>,
}

impl SessionReport {
    pub fn metadata(&self) -> &RecordingMetadata {
        &self.metadata
    }

    /// Ordered `(elapsed_seconds, degrees)` for a joint
    pub fn series(&self, joint: JointName) -> &[(f64, f64)] {
        self.series.get(&joint).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every joint's series in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (JointName, &[(f64, f64)])> + '_ {
        JointName::ALL
            .into_iter()
            .map(move |joint| (joint, self.series(joint)))
    }

    /// Check whether no joint has any sample
    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }

    /// Total number of `(elapsed, degrees)` points across joints
    pub fn point_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Recording span in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.metadata.duration_ms as f64 / 1000.0
    }

    pub fn summary(&self, joint: JointName) -> Option<JointSummary> {
        JointSummary::from_series(self.series(joint))
    }

    /// Summaries of joints with at least one finite sample
    pub fn summaries(&self) -> Vec<(JointName, JointSummary)> {
        JointName::ALL
            .into_iter()
            .filter_map(|joint| self.summary(joint).map(|s| (joint, s)))
            .collect()
    }

    /// Save report as JSON
    pub fn save_json(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a report saved with [`SessionReport::save_json`]
    pub fn load_json(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut report: SessionReport = serde_json::from_str(&content)?;
        for joint in JointName::ALL {
            report.series.entry(joint).or_default();
        }
        Ok(report)
    }
}

/// Builds [`SessionReport`]s from completed recordings
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReportBuilder;

impl SessionReportBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Split a recording into per-joint series. Joints absent from a sample
    /// are skipped for that sample only.
    pub fn build(&self, recording: &CompletedRecording) -> SessionReport {
        let mut series: BTreeMap<JointName, Vec<(f64, f64)>> =
            JointName::ALL.into_iter().map(|joint| (joint, Vec::new())).collect();

        for sample in recording.samples() {
            for (joint, degrees) in sample.angles.iter() {
                if let Some(points) = series.get_mut(&joint) {
                    points.push((sample.elapsed_seconds, degrees));
                }
            }
        }

        tracing::debug!(
            name = %recording.metadata().name,
            samples = recording.len(),
            "Built session report"
        );

        SessionReport {
            metadata: recording.metadata().clone(),
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::JointAngles;
    use crate::workflow::recording::RecordedSample;
    use tempfile::TempDir;

    fn sample(elapsed_seconds: f64, angles: &[(JointName, f64)]) -> RecordedSample {
        RecordedSample {
            elapsed_seconds,
            angles: angles.iter().copied().collect::<JointAngles>(),
        }
    }

    #[test]
    fn test_empty_recording_maps_every_joint_to_empty_series() {
        let report = SessionReportBuilder::new().build(&CompletedRecording::empty());

        for (joint, series) in report.iter() {
            assert!(series.is_empty(), "{joint} should be empty");
        }
        assert_eq!(report.iter().count(), JointName::COUNT);
        assert!(report.is_empty());
        assert!(report.summaries().is_empty());
    }

    #[test]
    fn test_missing_joints_skipped_per_entry() {
        let recording = CompletedRecording::from_samples(
            "mixed",
            vec![
                sample(0.0, &[(JointName::KneeL, 10.0)]),
                sample(0.2, &[(JointName::KneeL, 12.0), (JointName::AnkleL, 30.0)]),
            ],
        );

        let report = SessionReportBuilder::new().build(&recording);
        assert_eq!(report.series(JointName::KneeL), &[(0.0, 10.0), (0.2, 12.0)]);
        assert_eq!(report.series(JointName::AnkleL), &[(0.2, 30.0)]);
        assert!(report.series(JointName::HipR).is_empty());
        assert_eq!(report.point_count(), 3);
    }

    #[test]
    fn test_summary_statistics() {
        let recording = CompletedRecording::from_samples(
            "stats",
            vec![
                sample(0.0, &[(JointName::HipL, 170.0)]),
                sample(0.1, &[(JointName::HipL, 110.0)]),
                sample(0.2, &[(JointName::HipL, 140.0)]),
            ],
        );
        let report = SessionReportBuilder::new().build(&recording);

        let summary = report.summary(JointName::HipL).unwrap();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.min, 110.0);
        assert_eq!(summary.max, 170.0);
        assert!((summary.mean - 140.0).abs() < 1e-9);
        assert_eq!(summary.range_of_motion, 60.0);
        assert!(report.summary(JointName::KneeL).is_none());
        assert!((report.duration_seconds() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_summary_ignores_non_finite_values() {
        let summary = JointSummary::from_series(&[(0.0, f64::NAN), (0.1, 90.0)]).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.mean, 90.0);
        assert!(JointSummary::from_series(&[(0.0, f64::NAN)]).is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        let recording = CompletedRecording::from_samples(
            "json",
            vec![sample(0.5, &[(JointName::KneeR, 150.0)])],
        );
        let report = SessionReportBuilder::new().build(&recording);
        report.save_json(&path).unwrap();

        let loaded = SessionReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.series(JointName::KneeR), &[(0.5, 150.0)]);
    }
}
