//! Recording Controller and Recording Format
//!
//! The controller is a two-state machine. While Idle it ignores every frame.
//! While Recording it accepts at most one snapshot per throttle interval,
//! measured on frame timestamps, and stores it with its elapsed time since
//! the recording was armed. Stopping moves the buffer out as an immutable
//! [`CompletedRecording`].

use crate::analysis::JointAngles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Current recording format version
pub const CURRENT_FORMAT_VERSION: &str = "1.0";

/// Default minimum spacing between recorded samples, in seconds
pub const DEFAULT_THROTTLE_INTERVAL_SECS: f64 = 0.1;

/// Slack on the throttle comparison so frames spaced exactly one interval
/// apart are not lost to float rounding
pub const THROTTLE_TOLERANCE_SECS: f64 = 1e-9;

/// Name given to recordings started without one
pub const DEFAULT_RECORDING_NAME: &str = "untitled";

/// Recording metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingMetadata {
    /// Unique recording ID
    pub id: Uuid,
    /// Recording name
    pub name: String,
    /// Wall-clock time the recording was armed
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the recording was stopped
    pub ended_at: Option<DateTime<Utc>>,
    /// Number of recorded samples
    pub sample_count: usize,
    /// Span between arming and the last observed frame, in milliseconds
    pub duration_ms: u64,
    /// Version of the recording format
    pub format_version: String,
}

impl RecordingMetadata {
    /// Create new metadata for a recording
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            started_at: Utc::now(),
            ended_at: None,
            sample_count: 0,
            duration_ms: 0,
            format_version: CURRENT_FORMAT_VERSION.to_string(),
        }
    }

    /// Finalize with end time and sample count
    pub fn finalize(&mut self, sample_count: usize, duration_ms: u64) {
        self.ended_at = Some(Utc::now());
        self.sample_count = sample_count;
        self.duration_ms = duration_ms;
    }
}

impl Default for RecordingMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_RECORDING_NAME)
    }
}

/// One accepted snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSample {
    /// Seconds since the recording was armed
    pub elapsed_seconds: f64,
    pub angles: JointAngles,
}

/// The buffer of a stopped recording.
///
/// Produced only by [`RecordingController::stop`] or by loading a saved
/// recording; there is no way to append to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRecording {
    metadata: RecordingMetadata,
    samples: Vec<RecordedSample>,
}

impl CompletedRecording {
    /// Build a finished recording from samples gathered elsewhere
    /// (e.g. an angle log). Samples must already be in elapsed order.
    pub fn from_samples(name: impl Into<String>, samples: Vec<RecordedSample>) -> Self {
        let duration_ms = samples
            .last()
            .map(|s| secs_to_ms(s.elapsed_seconds))
            .unwrap_or(0);
        let mut metadata = RecordingMetadata::new(name);
        metadata.finalize(samples.len(), duration_ms);
        Self { metadata, samples }
    }

    /// A recording with no samples
    pub fn empty() -> Self {
        Self::from_samples(DEFAULT_RECORDING_NAME, Vec::new())
    }

    pub fn metadata(&self) -> &RecordingMetadata {
        &self.metadata
    }

    pub fn samples(&self) -> &[RecordedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Save recording to a file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load recording from a file.
    ///
    /// Logs a warning if the recording was saved with an unknown format version,
    /// but still attempts to deserialize it (metadata fields fall back to defaults).
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recording: CompletedRecording = serde_json::from_str(&content)?;
        if recording.metadata.format_version != CURRENT_FORMAT_VERSION {
            tracing::warn!(
                name = %recording.metadata.name,
                found = %recording.metadata.format_version,
                expected = CURRENT_FORMAT_VERSION,
                "Recording has different format version; some fields may use default values"
            );
        }
        Ok(recording)
    }
}

/// Controller status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
}

/// State held only while Recording
#[derive(Debug)]
struct ActiveRecording {
    metadata: RecordingMetadata,
    armed_at: f64,
    last_emit: Option<f64>,
    last_seen: f64,
    buffer: Vec<RecordedSample>,
    dropped: u64,
}

/// Idle/Recording state machine with timestamp-based throttling
#[derive(Debug)]
pub struct RecordingController {
    throttle_interval: f64,
    active: Option<ActiveRecording>,
}

impl RecordingController {
    /// Create an idle controller with the default 0.1 s throttle
    pub fn new() -> Self {
        Self::with_throttle(DEFAULT_THROTTLE_INTERVAL_SECS)
    }

    /// Create an idle controller with a custom throttle interval.
    ///
    /// An interval of zero records every observed frame.
    pub fn with_throttle(throttle_interval: f64) -> Self {
        Self {
            throttle_interval: throttle_interval.max(0.0),
            active: None,
        }
    }

    pub fn throttle_interval(&self) -> f64 {
        self.throttle_interval
    }

    pub fn status(&self) -> RecordingStatus {
        if self.active.is_some() {
            RecordingStatus::Recording
        } else {
            RecordingStatus::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Monotonic time the current recording was armed
    pub fn armed_at(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.armed_at)
    }

    /// Samples accepted so far in the current recording
    pub fn len(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.buffer.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arm an untitled recording at monotonic time `now`
    pub fn start(&mut self, now: f64) {
        self.start_named(DEFAULT_RECORDING_NAME, now);
    }

    /// Arm a named recording at monotonic time `now`.
    ///
    /// Ignored while already recording; the running session is kept.
    pub fn start_named(&mut self, name: impl Into<String>, now: f64) {
        if let Some(active) = &self.active {
            tracing::warn!(
                name = %active.metadata.name,
                armed_at = active.armed_at,
                "Recording already in progress; start ignored"
            );
            return;
        }

        let metadata = RecordingMetadata::new(name);
        tracing::info!(name = %metadata.name, id = %metadata.id, armed_at = now, "Recording started");
        self.active = Some(ActiveRecording {
            metadata,
            armed_at: now,
            last_emit: None,
            last_seen: now,
            buffer: Vec::new(),
            dropped: 0,
        });
    }

    /// Offer a snapshot. Returns whether it was recorded.
    pub fn observe(&mut self, timestamp: f64, angles: &JointAngles) -> bool {
        let interval = self.throttle_interval;
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.last_seen = active.last_seen.max(timestamp);

        let due = match active.last_emit {
            None => true,
            Some(last) => timestamp - last + THROTTLE_TOLERANCE_SECS >= interval,
        };
        if !due {
            active.dropped += 1;
            tracing::debug!(timestamp, "Sample throttled");
            return false;
        }

        let elapsed_seconds = (timestamp - active.armed_at).max(0.0);
        active.buffer.push(RecordedSample {
            elapsed_seconds,
            angles: angles.clone(),
        });
        active.last_emit = Some(timestamp);
        true
    }

    /// Disarm and hand over the buffer. Idle controllers return an empty recording.
    pub fn stop(&mut self) -> CompletedRecording {
        let Some(active) = self.active.take() else {
            tracing::debug!("Stop while idle; returning empty recording");
            return CompletedRecording::empty();
        };

        let ActiveRecording {
            mut metadata,
            armed_at,
            last_seen,
            buffer,
            dropped,
            ..
        } = active;

        metadata.finalize(buffer.len(), secs_to_ms(last_seen - armed_at));
        tracing::info!(
            name = %metadata.name,
            samples = buffer.len(),
            throttled = dropped,
            duration_ms = metadata.duration_ms,
            "Recording stopped"
        );

        CompletedRecording {
            metadata,
            samples: buffer,
        }
    }
}

impl Default for RecordingController {
    fn default() -> Self {
        Self::new()
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}
