//! # Joint Angles
//!
//! A joint angle time-series engine. It consumes per-frame 2D body landmarks
//! produced by an external pose-estimation model, derives a fixed set of
//! lower-limb joint angles, keeps a rolling per-joint history for live
//! display, and records throttled, timestamped angle snapshots that are
//! exported as a session report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use joint_angles::{AnalysisSession, JointName};
//! use joint_angles::pose::source::JsonLinesSource;
//!
//! let mut session = AnalysisSession::new(Default::default());
//! let mut source = JsonLinesSource::open("frames.jsonl").expect("open frames");
//!
//! session.start_recording(0.0);
//! session.run(&mut source).expect("process frames");
//! let report = session.stop_recording();
//!
//! for (elapsed, degrees) in report.series(JointName::KneeL) {
//!     println!("{elapsed:.2}s knee_l={degrees:.1}");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`analysis`]: angle geometry, joint topology table and extraction
//! - [`live`]: time-bounded rolling window per joint
//! - [`workflow`]: recording state machine, session reports, driving loop
//! - [`pose`]: landmark frames, detections and pose sources
//! - [`export`]: angle log lines, CSV and Markdown report output
//! - [`time`]: wall-clock stamps for the angle log
//! - [`app`]: CLI and configuration management
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌──────────────┐
//! │ PoseSource  │───▶│  Extractor  │───▶│ RollingWindow│  (always)
//! │ (detection) │    │ (angle map) │    └──────────────┘
//! └─────────────┘    └─────────────┘    ┌──────────────┐    ┌──────────────┐
//!                           └──────────▶│  Recording   │───▶│ SessionReport│
//!                                       │  Controller  │    │   (export)   │
//!                                       └──────────────┘    └──────────────┘
//! ```

pub mod analysis;
pub mod app;
pub mod export;
pub mod live;
pub mod pose;
pub mod time;
pub mod workflow;

// Re-export commonly used types
pub use analysis::{joint_angle, JointAngleExtractor, JointAngles, JointName, Point2};
pub use live::RollingWindowBuffer;
pub use pose::{Detection, Landmark, LandmarkFrame, PoseSample};
pub use workflow::{
    AnalysisSession, CompletedRecording, RecordingController, SessionReport,
    SessionReportBuilder,
};

/// Result type alias for the joint angle engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the joint angle engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A detected frame lacks a landmark required by the joint topology.
    #[error("Missing landmark {landmark} required for joint {joint}")]
    MissingLandmark {
        joint: JointName,
        landmark: Landmark,
    },

    #[error("Pose source error: {0}")]
    Source(String),

    #[error("Angle log format error: {0}")]
    LogFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
