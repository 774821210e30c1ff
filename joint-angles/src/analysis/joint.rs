//! Joint names and per-frame angle maps

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The joints whose angles are tracked.
///
/// Declaration order is the canonical output order (log lines, reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    KneeL,
    KneeR,
    AnkleL,
    AnkleR,
    HipL,
    HipR,
}

impl JointName {
    /// Number of tracked joints
    pub const COUNT: usize = 6;

    /// All joints in canonical order
    pub const ALL: [JointName; JointName::COUNT] = [
        JointName::KneeL,
        JointName::KneeR,
        JointName::AnkleL,
        JointName::AnkleR,
        JointName::HipL,
        JointName::HipR,
    ];

    /// Short name used in logs and reports (e.g. `knee_l`)
    pub fn as_str(&self) -> &'static str {
        match self {
            JointName::KneeL => "knee_l",
            JointName::KneeR => "knee_r",
            JointName::AnkleL => "ankle_l",
            JointName::AnkleR => "ankle_r",
            JointName::HipL => "hip_l",
            JointName::HipR => "hip_r",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JointName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointName::ALL
            .into_iter()
            .find(|joint| joint.as_str() == s)
            .ok_or_else(|| crate::Error::LogFormat(format!("unknown joint name '{s}'")))
    }
}

/// Angles computed for one frame, keyed by joint, in degrees.
///
/// An empty map is the normal value for a frame without a detected pose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointAngles(BTreeMap<JointName, f64>);

impl JointAngles {
    /// Create an empty angle map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the angle for a joint
    pub fn insert(&mut self, joint: JointName, degrees: f64) {
        self.0.insert(joint, degrees);
    }

    /// Angle for a joint, if present
    pub fn get(&self, joint: JointName) -> Option<f64> {
        self.0.get(&joint).copied()
    }

    /// Check whether a joint is present
    pub fn contains(&self, joint: JointName) -> bool {
        self.0.contains_key(&joint)
    }

    /// Iterate in canonical joint order
    pub fn iter(&self) -> impl Iterator<Item = (JointName, f64)> + '_ {
        self.0.iter().map(|(joint, degrees)| (*joint, *degrees))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Angles of one processed frame, stamped with its monotonic time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSnapshot {
    /// Monotonic seconds
    pub timestamp: f64,
    pub angles: JointAngles,
}

impl FromIterator<(JointName, f64)> for JointAngles {
    fn from_iter<I: IntoIterator<Item = (JointName, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_name_roundtrip() {
        for joint in JointName::ALL {
            assert_eq!(joint.as_str().parse::<JointName>().unwrap(), joint);
        }
    }

    #[test]
    fn test_unknown_joint_name_rejected() {
        assert!("elbow_l".parse::<JointName>().is_err());
        assert!("KNEE_L".parse::<JointName>().is_err());
    }

    #[test]
    fn test_iteration_follows_canonical_order() {
        let angles: JointAngles = [
            (JointName::HipR, 3.0),
            (JointName::KneeL, 1.0),
            (JointName::AnkleL, 2.0),
        ]
        .into_iter()
        .collect();

        let order: Vec<JointName> = angles.iter().map(|(joint, _)| joint).collect();
        assert_eq!(order, vec![JointName::KneeL, JointName::AnkleL, JointName::HipR]);
    }

    #[test]
    fn test_serializes_with_snake_case_keys() {
        let mut angles = JointAngles::new();
        angles.insert(JointName::KneeL, 10.0);
        angles.insert(JointName::AnkleR, 95.5);

        let json = serde_json::to_string(&angles).unwrap();
        assert_eq!(json, r#"{"knee_l":10.0,"ankle_r":95.5}"#);

        let back: JointAngles = serde_json::from_str(&json).unwrap();
        assert_eq!(back, angles);
    }

    #[test]
    fn test_empty_map() {
        let angles = JointAngles::new();
        assert!(angles.is_empty());
        assert_eq!(angles.get(JointName::HipL), None);
        assert!(!angles.contains(JointName::HipL));
    }
}
