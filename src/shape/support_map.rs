//! Trait for support-mapping based shapes.

use crate::math::{Isometry, Point, UnitVector, Vector};
use na::Unit;

/// Trait of convex shapes representable by a support mapping.
///
/// The support mapping of a convex set returns the point of the set
/// that is the farthest along a given direction. It is the only
/// primitive the GJK and EPA algorithms need.
pub trait SupportMap {
    /// The support point of this shape along `dir`, in local space.
    fn local_support_point(&self, dir: &Vector) -> Point;

    /// Same as [`Self::local_support_point`] but with a direction
    /// known to be unit-length.
    fn local_support_point_toward(&self, dir: &UnitVector) -> Point {
        self.local_support_point(dir.as_ref())
    }

    /// The support point of this shape transformed by `transform`,
    /// along the world-space direction `dir`.
    fn support_point(&self, transform: &Isometry, dir: &Vector) -> Point {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }

    /// Same as [`Self::support_point`] but with a direction known to
    /// be unit-length.
    fn support_point_toward(&self, transform: &Isometry, dir: &UnitVector) -> Point {
        let local_dir = Unit::new_unchecked(transform.inverse_transform_vector(dir));
        transform * self.local_support_point_toward(&local_dir)
    }
}
