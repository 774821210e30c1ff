//! Rolling Window Buffer for Live Display
//!
//! Keeps the most recent `window_seconds` of angle samples per joint. Samples
//! are appended in frame-arrival order and evicted from the front when a newer
//! push makes them older than the window. Nothing is evicted between pushes.
//!
//! The buffer is transient and only feeds live charts; it is never persisted.

use crate::analysis::{JointAngles, JointName};
use std::collections::{BTreeMap, VecDeque};

/// Default live window length in seconds
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;

/// A retained sample
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowSample {
    timestamp: f64,
    degrees: f64,
}

/// Buffer statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Total samples pushed
    pub samples_pushed: u64,
    /// Samples dropped because they fell out of the window
    pub samples_evicted: u64,
    /// Largest number of samples held for any one joint
    pub peak_occupancy: usize,
}

/// Per-joint time-bounded history
#[derive(Debug, Clone)]
pub struct RollingWindowBuffer {
    window_seconds: f64,
    /// One series per joint, indexed by `JointName as usize`
    series: [VecDeque<WindowSample>; JointName::COUNT],
    stats: WindowStats,
}

impl RollingWindowBuffer {
    /// Create a buffer with the default 10 second window
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_SECONDS)
    }

    /// Create a buffer with a custom window length.
    ///
    /// Negative lengths are clamped to zero and non-finite ones fall back to
    /// [`DEFAULT_WINDOW_SECONDS`].
    pub fn with_window(window_seconds: f64) -> Self {
        let window_seconds = if !window_seconds.is_finite() {
            tracing::warn!(window_seconds, "Non-finite rolling window; using default");
            DEFAULT_WINDOW_SECONDS
        } else if window_seconds < 0.0 {
            tracing::warn!(window_seconds, "Negative rolling window; clamped to zero");
            0.0
        } else {
            window_seconds
        };

        Self {
            window_seconds,
            series: Default::default(),
            stats: WindowStats::default(),
        }
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }

    /// Append a sample and evict entries older than the window, measured
    /// from `timestamp`.
    pub fn push(&mut self, joint: JointName, timestamp: f64, degrees: f64) {
        let window = self.window_seconds;
        let series = &mut self.series[joint as usize];
        series.push_back(WindowSample { timestamp, degrees });
        self.stats.samples_pushed += 1;

        while let Some(front) = series.front() {
            if timestamp - front.timestamp > window {
                series.pop_front();
                self.stats.samples_evicted += 1;
            } else {
                break;
            }
        }

        self.stats.peak_occupancy = self.stats.peak_occupancy.max(series.len());
    }

    /// Push every angle of a snapshot at the same timestamp
    pub fn push_angles(&mut self, timestamp: f64, angles: &JointAngles) {
        for (joint, degrees) in angles.iter() {
            self.push(joint, timestamp, degrees);
        }
    }

    /// Retained samples as `(relative_time, degrees)`, where relative time is
    /// measured from the earliest retained sample (so the first entry is 0).
    pub fn query(&self, joint: JointName) -> Vec<(f64, f64)> {
        let series = &self.series[joint as usize];
        let Some(first) = series.front() else {
            return Vec::new();
        };
        let t_min = first.timestamp;

        series
            .iter()
            .map(|sample| (sample.timestamp - t_min, sample.degrees))
            .collect()
    }

    /// Relative series for every joint that holds at least one sample
    pub fn query_all(&self) -> BTreeMap<JointName, Vec<(f64, f64)>> {
        JointName::ALL
            .into_iter()
            .filter(|joint| !self.series[*joint as usize].is_empty())
            .map(|joint| (joint, self.query(joint)))
            .collect()
    }

    /// Most recent `(timestamp, degrees)` for a joint
    pub fn latest(&self, joint: JointName) -> Option<(f64, f64)> {
        self.series[joint as usize]
            .back()
            .map(|sample| (sample.timestamp, sample.degrees))
    }

    /// Number of retained samples for a joint
    pub fn len(&self, joint: JointName) -> usize {
        self.series[joint as usize].len()
    }

    /// Check if no joint holds any sample
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(VecDeque::is_empty)
    }

    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    /// Drop all samples (statistics are kept)
    pub fn clear(&mut self) {
        self.series.iter_mut().for_each(VecDeque::clear);
    }
}

impl Default for RollingWindowBuffer {
    fn default() -> Self {
        Self::new()
    }
}
