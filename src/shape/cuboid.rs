use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A rectangular box centered at the origin, given by its half-extents.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cuboid {
    /// The half-extents of the box along each coordinate axis.
    pub half_extents: Vector,
}

impl Cuboid {
    /// Creates a new box from its half-extents.
    #[inline]
    pub fn new(half_extents: Vector) -> Cuboid {
        Cuboid { half_extents }
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let mut res = self.half_extents;
        for i in 0..3 {
            res[i] = res[i].copysign(dir[i]);
        }
        Point::from(res)
    }
}

impl Cuboid {
    /// The volume of this box.
    #[inline]
    pub fn volume(&self) -> Real {
        self.half_extents.product() * 8.0
    }
}
