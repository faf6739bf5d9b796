use crate::math::{Point, Real, UnitVector};
use na::Unit;

/// Computes the outward normal of a counter-clockwise oriented face.
///
/// Returns `None` if the face is degenerate.
#[inline]
pub fn ccw_face_normal(pts: [&Point; 3]) -> Option<UnitVector> {
    let ab = pts[1] - pts[0];
    let ac = pts[2] - pts[0];
    Unit::try_new(ab.cross(&ac), Real::EPSILON.sqrt())
}
