use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::SupportMap;
use na::Unit;

/// A sphere centered at the origin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Sphere {
    /// The radius of the sphere.
    pub radius: Real,
}

impl Sphere {
    /// Creates a new sphere with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Sphere {
        Sphere { radius }
    }
}

impl SupportMap for Sphere {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let dir = Unit::try_new(*dir, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
        self.local_support_point_toward(&dir)
    }

    #[inline]
    fn local_support_point_toward(&self, dir: &UnitVector) -> Point {
        Point::from(**dir * self.radius)
    }
}
