//! Support mapping based cone shape.

use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use num_traits::Zero;

/// A cone along the local `z` axis: apex at `+half_height`, circular
/// base of the given radius at `-half_height`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cone {
    /// Half the height of the cone.
    pub half_height: Real,
    /// The radius of the base.
    pub radius: Real,
}

impl Cone {
    /// Creates a new cone with the given half-height and base radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cone {
        Cone {
            half_height,
            radius,
        }
    }
}

impl SupportMap for Cone {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let mut vres = *dir;
        vres.z = 0.0;

        if vres.normalize_mut().is_zero() {
            vres = Vector::zeros();
            vres.z = self.half_height.copysign(dir.z);
        } else {
            vres *= self.radius;
            vres.z = -self.half_height;

            if dir.dot(&vres) < dir.z * self.half_height {
                vres = Vector::zeros();
                vres.z = self.half_height;
            }
        }

        Point::from(vres)
    }
}
