//! Joint Topology Table
//!
//! Declares which landmarks form each joint angle. The vertex is the joint
//! itself; the two arms are adjacent landmarks, except for the hip, whose
//! second arm is a synthetic point straight above the hip.

use super::joint::JointName;
use crate::pose::Landmark;

/// Second endpoint of a joint angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    /// A landmark from the frame
    Landmark(Landmark),
    /// `(vertex.x, vertex.y - offset)`: a vertical reference through the vertex
    VerticalReference,
}

/// Landmark triple for one joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTopology {
    pub joint: JointName,
    pub vertex: Landmark,
    pub arm: Landmark,
    pub reference: Arm,
}

impl JointTopology {
    const fn new(joint: JointName, vertex: Landmark, arm: Landmark, reference: Arm) -> Self {
        Self {
            joint,
            vertex,
            arm,
            reference,
        }
    }

    /// Landmarks that must be present in a frame for this joint
    pub fn required_landmarks(&self) -> impl Iterator<Item = Landmark> {
        let reference = match self.reference {
            Arm::Landmark(landmark) => Some(landmark),
            Arm::VerticalReference => None,
        };
        [self.vertex, self.arm].into_iter().chain(reference)
    }

    /// Topology entry for a joint
    pub fn of(joint: JointName) -> &'static JointTopology {
        // Table is declared in JointName order
        &JOINT_TOPOLOGY[joint as usize]
    }
}

/// Fixed anatomical adjacency, one entry per joint in canonical order
pub static JOINT_TOPOLOGY: [JointTopology; JointName::COUNT] = [
    JointTopology::new(
        JointName::KneeL,
        Landmark::LeftKnee,
        Landmark::LeftHip,
        Arm::Landmark(Landmark::LeftAnkle),
    ),
    JointTopology::new(
        JointName::KneeR,
        Landmark::RightKnee,
        Landmark::RightHip,
        Arm::Landmark(Landmark::RightAnkle),
    ),
    JointTopology::new(
        JointName::AnkleL,
        Landmark::LeftAnkle,
        Landmark::LeftKnee,
        Arm::Landmark(Landmark::LeftFootIndex),
    ),
    JointTopology::new(
        JointName::AnkleR,
        Landmark::RightAnkle,
        Landmark::RightKnee,
        Arm::Landmark(Landmark::RightFootIndex),
    ),
    JointTopology::new(
        JointName::HipL,
        Landmark::LeftHip,
        Landmark::LeftKnee,
        Arm::VerticalReference,
    ),
    JointTopology::new(
        JointName::HipR,
        Landmark::RightHip,
        Landmark::RightKnee,
        Arm::VerticalReference,
    ),
];
