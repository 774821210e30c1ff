//! Core types for pose input
//!
//! Landmark identifiers follow the MediaPipe Pose 33-point topology. Frames
//! are produced by an external pose-estimation model and are immutable once
//! built.

use crate::analysis::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named anatomical keypoints (MediaPipe Pose indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Landmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Landmark {
    /// Number of landmarks in the pose topology
    pub const COUNT: usize = 33;

    /// All landmarks in index order
    pub const ALL: [Landmark; Landmark::COUNT] = [
        Landmark::Nose,
        Landmark::LeftEyeInner,
        Landmark::LeftEye,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeInner,
        Landmark::RightEye,
        Landmark::RightEyeOuter,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::MouthLeft,
        Landmark::MouthRight,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftPinky,
        Landmark::RightPinky,
        Landmark::LeftIndex,
        Landmark::RightIndex,
        Landmark::LeftThumb,
        Landmark::RightThumb,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
        Landmark::LeftFootIndex,
        Landmark::RightFootIndex,
    ];

    /// Model output index
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Landmark for a model output index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Identifier as written by the pose model (e.g. `LEFT_KNEE`)
    pub fn name(&self) -> &'static str {
        match self {
            Landmark::Nose => "NOSE",
            Landmark::LeftEyeInner => "LEFT_EYE_INNER",
            Landmark::LeftEye => "LEFT_EYE",
            Landmark::LeftEyeOuter => "LEFT_EYE_OUTER",
            Landmark::RightEyeInner => "RIGHT_EYE_INNER",
            Landmark::RightEye => "RIGHT_EYE",
            Landmark::RightEyeOuter => "RIGHT_EYE_OUTER",
            Landmark::LeftEar => "LEFT_EAR",
            Landmark::RightEar => "RIGHT_EAR",
            Landmark::MouthLeft => "MOUTH_LEFT",
            Landmark::MouthRight => "MOUTH_RIGHT",
            Landmark::LeftShoulder => "LEFT_SHOULDER",
            Landmark::RightShoulder => "RIGHT_SHOULDER",
            Landmark::LeftElbow => "LEFT_ELBOW",
            Landmark::RightElbow => "RIGHT_ELBOW",
            Landmark::LeftWrist => "LEFT_WRIST",
            Landmark::RightWrist => "RIGHT_WRIST",
            Landmark::LeftPinky => "LEFT_PINKY",
            Landmark::RightPinky => "RIGHT_PINKY",
            Landmark::LeftIndex => "LEFT_INDEX",
            Landmark::RightIndex => "RIGHT_INDEX",
            Landmark::LeftThumb => "LEFT_THUMB",
            Landmark::RightThumb => "RIGHT_THUMB",
            Landmark::LeftHip => "LEFT_HIP",
            Landmark::RightHip => "RIGHT_HIP",
            Landmark::LeftKnee => "LEFT_KNEE",
            Landmark::RightKnee => "RIGHT_KNEE",
            Landmark::LeftAnkle => "LEFT_ANKLE",
            Landmark::RightAnkle => "RIGHT_ANKLE",
            Landmark::LeftHeel => "LEFT_HEEL",
            Landmark::RightHeel => "RIGHT_HEEL",
            Landmark::LeftFootIndex => "LEFT_FOOT_INDEX",
            Landmark::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Landmark {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .into_iter()
            .find(|landmark| landmark.name() == s)
            .ok_or_else(|| crate::Error::Source(format!("unknown landmark '{s}'")))
    }
}

/// A landmark position as reported by the pose model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal position, nominally 0-1
    pub x: f64,
    /// Vertical position, nominally 0-1 (grows downward)
    pub y: f64,
    /// Model visibility score, when the model reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    /// Position used for angle geometry
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Landmarks detected in a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: BTreeMap<Landmark, LandmarkPoint>,
}

impl LandmarkFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, landmark: Landmark, x: f64, y: f64) -> Self {
        self.insert(landmark, LandmarkPoint::new(x, y));
        self
    }

    pub fn insert(&mut self, landmark: Landmark, point: LandmarkPoint) {
        self.points.insert(landmark, point);
    }

    pub fn get(&self, landmark: Landmark) -> Option<&LandmarkPoint> {
        self.points.get(&landmark)
    }

    /// Build a frame from the model's dense output, one point per index
    pub fn from_dense(points: &[LandmarkPoint]) -> Self {
        let points = points
            .iter()
            .enumerate()
            .filter_map(|(i, point)| Landmark::from_index(i).map(|landmark| (landmark, *point)))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(Landmark, LandmarkPoint)> for LandmarkFrame {
    fn from_iter<I: IntoIterator<Item = (Landmark, LandmarkPoint)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Result of running the pose model on one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A pose was found; the frame carries its landmarks
    Detected(LandmarkFrame),
    /// No pose in this frame
    NotDetected,
}

impl Detection {
    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }

    pub fn frame(&self) -> Option<&LandmarkFrame> {
        match self {
            Detection::Detected(frame) => Some(frame),
            Detection::NotDetected => None,
        }
    }
}

impl From<Option<LandmarkFrame>> for Detection {
    fn from(frame: Option<LandmarkFrame>) -> Self {
        match frame {
            Some(frame) => Detection::Detected(frame),
            None => Detection::NotDetected,
        }
    }
}

/// A detection stamped with the monotonic time of its source frame
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    /// Monotonic seconds
    pub timestamp: f64,
    pub detection: Detection,
}

impl PoseSample {
    pub fn new(timestamp: f64, detection: Detection) -> Self {
        Self {
            timestamp,
            detection,
        }
    }
}
