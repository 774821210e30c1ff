//! Angle Analysis
//!
//! Geometry and joint topology for turning a landmark frame into the fixed
//! set of named lower-limb joint angles.

pub mod angle;
pub mod extractor;
pub mod joint;
pub mod topology;

pub use angle::{joint_angle, Point2};
pub use extractor::{ExtractorConfig, JointAngleExtractor, DEFAULT_VERTICAL_REFERENCE_OFFSET};
pub use joint::{AngleSnapshot, JointAngles, JointName};
pub use topology::{Arm, JointTopology, JOINT_TOPOLOGY};
