use crate::math::{Real, UnitVector};

/// A half-space: the set of points `x` with `normal · x ≤ d`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct HalfSpace {
    /// The outward normal of the boundary plane.
    pub normal: UnitVector,
    /// The offset of the boundary plane along its normal.
    pub d: Real,
}

impl HalfSpace {
    /// Creates a new half-space bounded by the plane `normal · x = d`.
    #[inline]
    pub fn new(normal: UnitVector, d: Real) -> HalfSpace {
        HalfSpace { normal, d }
    }
}

/// An infinite plane `normal · x = d`, considered two-sided.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Plane {
    /// The normal of the plane.
    pub normal: UnitVector,
    /// The offset of the plane along its normal.
    pub d: Real,
}

impl Plane {
    /// Creates a new plane `normal · x = d`.
    #[inline]
    pub fn new(normal: UnitVector, d: Real) -> Plane {
        Plane { normal, d }
    }
}
