use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use na::Unit;

/// A capsule: a segment along the local `z` axis swept by a sphere.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Capsule {
    /// Half the length of the capsule's inner segment.
    pub half_height: Real,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule aligned with the local `z` axis.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Capsule {
        Capsule {
            half_height,
            radius,
        }
    }

    /// The endpoints of the inner segment.
    #[inline]
    pub fn segment(&self) -> (Point, Point) {
        (
            Point::new(0.0, 0.0, -self.half_height),
            Point::new(0.0, 0.0, self.half_height),
        )
    }
}

impl SupportMap for Capsule {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let tip = Vector::new(0.0, 0.0, self.half_height.copysign(dir.z));
        let dir = Unit::try_new(*dir, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
        Point::from(tip + *dir * self.radius)
    }
}
