//! Pose input
//!
//! Landmark frames as produced by the external pose-estimation model, the
//! explicit detected/not-detected result, and sources that replay them.

pub mod source;
pub mod types;

pub use source::{JsonLinesSource, PoseSource, VecSource};
pub use types::{Detection, Landmark, LandmarkFrame, LandmarkPoint, PoseSample};
