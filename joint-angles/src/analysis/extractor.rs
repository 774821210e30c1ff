//! Joint Angle Extraction
//!
//! Maps a detection to the named angle set by walking the topology table.

use super::angle::{joint_angle, Point2};
use super::joint::{JointAngles, JointName};
use super::topology::{Arm, JointTopology, JOINT_TOPOLOGY};
use crate::pose::{Detection, Landmark, LandmarkFrame};
use serde::{Deserialize, Serialize};

/// Default height of the hip vertical reference, in normalized units
pub const DEFAULT_VERTICAL_REFERENCE_OFFSET: f64 = 0.1;

/// Extractor parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Distance above the hip of the synthetic vertical reference point.
    ///
    /// Measured in normalized image units and not corrected for aspect ratio
    /// or camera tilt.
    pub vertical_reference_offset: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            vertical_reference_offset: DEFAULT_VERTICAL_REFERENCE_OFFSET,
        }
    }
}

/// Computes joint angles from landmark frames
#[derive(Debug, Clone, Default)]
pub struct JointAngleExtractor {
    config: ExtractorConfig,
}

impl JointAngleExtractor {
    /// Create with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with explicit parameters
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Angles for one detection.
    ///
    /// `NotDetected` yields an empty map. A detected frame missing any
    /// landmark the topology needs is a malformed frame and fails with
    /// [`crate::Error::MissingLandmark`].
    pub fn extract(&self, detection: &Detection) -> crate::Result<JointAngles> {
        match detection {
            Detection::Detected(frame) => self.extract_frame(frame),
            Detection::NotDetected => Ok(JointAngles::new()),
        }
    }

    /// Angles for a frame known to contain a detected pose
    pub fn extract_frame(&self, frame: &LandmarkFrame) -> crate::Result<JointAngles> {
        JOINT_TOPOLOGY
            .iter()
            .map(|topology| Ok((topology.joint, self.angle_for(topology, frame)?)))
            .collect()
    }

    fn angle_for(&self, topology: &JointTopology, frame: &LandmarkFrame) -> crate::Result<f64> {
        let vertex = point(frame, topology.joint, topology.vertex)?;
        let arm = point(frame, topology.joint, topology.arm)?;
        let reference = match topology.reference {
            Arm::Landmark(landmark) => point(frame, topology.joint, landmark)?,
            Arm::VerticalReference => {
                Point2::new(vertex.x, vertex.y - self.config.vertical_reference_offset)
            }
        };

        Ok(joint_angle(arm, vertex, reference))
    }
}

fn point(frame: &LandmarkFrame, joint: JointName, landmark: Landmark) -> crate::Result<Point2> {
    frame
        .get(landmark)
        .map(|p| p.position())
        .ok_or(crate::Error::MissingLandmark { joint, landmark })
}
