//! Support mapping based cylinder shape.

use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use num_traits::Zero;

/// A cylinder along the local `z` axis.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cylinder {
    /// Half the height of the cylinder.
    pub half_height: Real,
    /// The radius of the cylinder.
    pub radius: Real,
}

impl Cylinder {
    /// Creates a new cylinder with the given half-height and radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cylinder {
        Cylinder {
            half_height,
            radius,
        }
    }
}

impl SupportMap for Cylinder {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let mut vres = *dir;
        vres.z = 0.0;

        if vres.normalize_mut().is_zero() {
            vres = Vector::zeros();
        } else {
            vres *= self.radius;
        }

        vres.z = self.half_height.copysign(dir.z);
        Point::from(vres)
    }
}
