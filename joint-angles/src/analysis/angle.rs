//! Vertex Angle Geometry
//!
//! Computes the interior angle at a vertex formed by two arms, using the
//! dot product of the arm vectors.

use serde::{Deserialize, Serialize};

/// A point in normalized 2D image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this point
    #[inline]
    fn minus(self, origin: Point2) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Angle in degrees at vertex `b` between arms `b→a` and `b→c`.
///
/// Returns a value in [0, 180]. When either arm has zero length (coincident
/// landmarks) the result is exactly `0.0`. NaN coordinates propagate as NaN.
pub fn joint_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    let ba = a.minus(b);
    let bc = c.minus(b);

    let norm_ba = ba.0.hypot(ba.1);
    let norm_bc = bc.0.hypot(bc.1);

    if norm_ba == 0.0 || norm_bc == 0.0 {
        return 0.0;
    }

    let dot = ba.0 * bc.0 + ba.1 * bc.1;

    // Rounding can push |cos| slightly past 1 for collinear arms
    let cos_angle = (dot / (norm_ba * norm_bc)).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
}
