//! Aliases for the mathematical types used throughout this crate.

/// The scalar type used throughout this crate.
pub type Real = f64;

/// The default tolerance used for geometric operations.
pub const DEFAULT_EPSILON: Real = Real::EPSILON;

/// The dimension of the space.
pub const DIM: usize = 3;

/// A 3D vector.
pub type Vector = na::Vector3<Real>;

/// A 3D point.
pub type Point = na::Point3<Real>;

/// A 3×3 matrix.
pub type Matrix = na::Matrix3<Real>;

/// A unit-length 3D vector.
pub type UnitVector = na::Unit<Vector>;

/// A rigid transformation: rotation followed by translation.
pub type Isometry = na::Isometry3<Real>;

/// A translation.
pub type Translation = na::Translation3<Real>;

/// Does the rotational part of `m` leave vectors unchanged (within
/// `DEFAULT_EPSILON`)?
///
/// Transformations detected here take translation-only fast paths in
/// AABB updates.
#[inline]
pub fn rotation_is_identity(m: &Isometry) -> bool {
    m.rotation.angle() <= DEFAULT_EPSILON.sqrt()
}

/// Applies the component-wise absolute value of the rotational part
/// of `m` to the vector `v`.
///
/// This is the standard way of transforming AABB half-extents by a
/// rigid motion.
#[inline]
pub fn absolute_transform_vector(m: &Isometry, v: &Vector) -> Vector {
    m.rotation.to_rotation_matrix().into_inner().abs() * v
}
