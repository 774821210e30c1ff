//! Workflow Module
//!
//! Recording lifecycle from the first armed frame to the finished session report.

pub mod recording;
pub mod report;
pub mod session;

pub use recording::{
    CompletedRecording, RecordedSample, RecordingController, RecordingMetadata, RecordingStatus,
};
pub use report::{JointSummary, SessionReport, SessionReportBuilder};
pub use session::{AnalysisSession, FrameOutcome, RunStats, SessionConfig};
