//! Analysis Session
//!
//! Single-threaded driving loop. Each pose sample flows through the
//! extractor into the live window and the recording controller. Frames
//! without a pose carry an empty angle map through both. Recorded samples are optionally mirrored to an
//! [`AngleLog`].

use super::recording::{CompletedRecording, RecordingController, DEFAULT_THROTTLE_INTERVAL_SECS};
use super::report::{SessionReport, SessionReportBuilder};
use crate::analysis::{AngleSnapshot, ExtractorConfig, JointAngleExtractor};
use crate::export::AngleLog;
use crate::live::{RollingWindowBuffer, DEFAULT_WINDOW_SECONDS};
use crate::pose::{PoseSample, PoseSource};
use crate::time::unix_now_secs;
use serde::{Deserialize, Serialize};

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub extractor: ExtractorConfig,
    /// Live window length in seconds
    pub window_seconds: f64,
    /// Minimum spacing between recorded samples in seconds
    pub throttle_interval_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            window_seconds: DEFAULT_WINDOW_SECONDS,
            throttle_interval_secs: DEFAULT_THROTTLE_INTERVAL_SECS,
        }
    }
}

/// What happened to one processed frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub snapshot: AngleSnapshot,
    /// Whether a pose was present
    pub detected: bool,
    /// Whether the recording accepted the snapshot
    pub recorded: bool,
}

/// Counters over a [`AnalysisSession::run`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: usize,
    pub detected: usize,
    pub recorded: usize,
}

/// Owns the per-frame pipeline and the recording lifecycle
pub struct AnalysisSession {
    extractor: JointAngleExtractor,
    window: RollingWindowBuffer,
    controller: RecordingController,
    report_builder: SessionReportBuilder,
    angle_log: Option<AngleLog>,
    latest: Option<AngleSnapshot>,
    /// Wall-clock time matching the monotonic arming time
    unix_origin: f64,
}

impl AnalysisSession {
    /// Create a session from its tunables
    pub fn new(config: SessionConfig) -> Self {
        Self {
            extractor: JointAngleExtractor::with_config(config.extractor),
            window: RollingWindowBuffer::with_window(config.window_seconds),
            controller: RecordingController::with_throttle(config.throttle_interval_secs),
            report_builder: SessionReportBuilder::new(),
            angle_log: None,
            latest: None,
            unix_origin: 0.0,
        }
    }

    /// Mirror every recorded sample to an angle log
    pub fn attach_log(&mut self, log: AngleLog) {
        self.angle_log = Some(log);
    }

    /// Detach and return the angle log, if any
    pub fn detach_log(&mut self) -> Option<AngleLog> {
        self.angle_log.take()
    }

    /// Run one sample through the pipeline
    pub fn process(&mut self, sample: &PoseSample) -> crate::Result<FrameOutcome> {
        let timestamp = sample.timestamp;

        let detected = sample.detection.is_detected();
        if !detected {
            tracing::debug!(timestamp, "No pose detected");
        }
        let angles = self.extractor.extract(&sample.detection)?;

        // An empty map flows through like any other snapshot
        self.window.push_angles(timestamp, &angles);
        let recorded = self.controller.observe(timestamp, &angles);

        if recorded {
            if let (Some(log), Some(armed_at)) = (self.angle_log.as_mut(), self.controller.armed_at()) {
                let elapsed = (timestamp - armed_at).max(0.0);
                log.append(self.unix_origin + elapsed, &angles)?;
            }
        }

        let snapshot = AngleSnapshot { timestamp, angles };
        self.latest = Some(snapshot.clone());

        Ok(FrameOutcome {
            snapshot,
            detected,
            recorded,
        })
    }

    /// Drain a source, stopping at the first error
    pub fn run(&mut self, source: &mut dyn PoseSource) -> crate::Result<RunStats> {
        let mut stats = RunStats::default();

        while let Some(sample) = source.next_sample()? {
            let outcome = self.process(&sample)?;
            stats.frames += 1;
            stats.detected += usize::from(outcome.detected);
            stats.recorded += usize::from(outcome.recorded);
        }

        tracing::info!(
            frames = stats.frames,
            detected = stats.detected,
            recorded = stats.recorded,
            "Pose source exhausted"
        );
        Ok(stats)
    }

    /// Arm an untitled recording at monotonic time `now`
    pub fn start_recording(&mut self, now: f64) {
        self.start_named_recording(super::recording::DEFAULT_RECORDING_NAME, now);
    }

    /// Arm a named recording at monotonic time `now`
    pub fn start_named_recording(&mut self, name: impl Into<String>, now: f64) {
        if !self.controller.is_recording() {
            self.unix_origin = unix_now_secs();
        }
        self.controller.start_named(name, now);
    }

    /// Stop recording and hand back the raw buffer
    pub fn finish_recording(&mut self) -> CompletedRecording {
        self.controller.stop()
    }

    /// Stop recording and reduce the buffer to a report
    pub fn stop_recording(&mut self) -> SessionReport {
        let recording = self.finish_recording();
        self.report_builder.build(&recording)
    }

    /// Start when idle, stop when recording. Returns the report on stop.
    pub fn toggle_recording(&mut self, now: f64) -> Option<SessionReport> {
        if self.controller.is_recording() {
            Some(self.stop_recording())
        } else {
            self.start_recording(now);
            None
        }
    }

    pub fn is_recording(&self) -> bool {
        self.controller.is_recording()
    }

    /// Live per-joint history
    pub fn window(&self) -> &RollingWindowBuffer {
        &self.window
    }

    /// Snapshot of the most recently processed frame
    pub fn latest(&self) -> Option<&AngleSnapshot> {
        self.latest.as_ref()
    }

    pub fn controller(&self) -> &RecordingController {
        &self.controller
    }

    pub fn extractor(&self) -> &JointAngleExtractor {
        &self.extractor
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
