//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingSphere;
use crate::math::{self, Isometry, Point, Real, Vector, DIM};

/// An Axis Aligned Bounding Box.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of this AABB.
    pub mins: Point,
    /// The point with the greatest coordinates of this AABB.
    pub maxs: Point,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// `mins` must be componentwise smaller than `maxs`.
    #[inline]
    pub fn new(mins: Point, maxs: Point) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::MAX` and `maxs` components
    /// set to `-Real::MAX`.
    ///
    /// This is often used as the initial value of merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new AABB from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point, half_extents: Vector) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB from a set of points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(*pt);
        }
        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector {
        self.maxs - self.mins
    }

    /// The length of the diagonal of this AABB.
    ///
    /// This is the size surrogate driving the descend rule of the
    /// traversal engine.
    #[inline]
    pub fn size(&self) -> Real {
        self.extents().norm()
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Computes the AABB bounding `self` transformed by `m`.
    ///
    /// Translation-only transforms take a fast path.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        if math::rotation_is_identity(m) {
            let shift = m.translation.vector;
            Aabb::new(self.mins + shift, self.maxs + shift)
        } else {
            let center = m * self.center();
            let ws_half_extents = math::absolute_transform_vector(m, &self.half_extents());
            Aabb::from_half_extents(center, ws_half_extents)
        }
    }

    /// The smallest bounding sphere containing this AABB.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center = self.center();
        let radius = na::distance(&self.mins, &self.maxs) * 0.5;
        BoundingSphere::new(center, radius)
    }

    /// Does this AABB contain the given point?
    #[inline]
    pub fn contains_local_point(&self, point: &Point) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Does this AABB intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for i in 0..DIM {
            if self.mins[i] > other.maxs[i] || other.mins[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// The distance between this AABB and `other`.
    ///
    /// Returns 0.0 if they intersect or touch. This is exact.
    pub fn distance(&self, other: &Aabb) -> Real {
        let mut sq = 0.0;

        for i in 0..DIM {
            let gap = (self.mins[i] - other.maxs[i]).max(other.mins[i] - self.maxs[i]);
            if gap > 0.0 {
                sq += gap * gap;
            }
        }

        sq.sqrt()
    }

    /// Merges this AABB with `other` in-place.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.coords.inf(&other.mins.coords).into();
        self.maxs = self.maxs.coords.sup(&other.maxs.coords).into();
    }

    /// Returns the smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        result.merge(other);
        result
    }

    /// Enlarges this AABB by `amount` on all sides.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        let delta = Vector::repeat(amount);
        Aabb::new(self.mins - delta, self.maxs + delta)
    }

    /// The eight vertices of this AABB.
    pub fn vertices(&self) -> [Point; 8] {
        let a = &self.mins;
        let b = &self.maxs;
        [
            Point::new(a.x, a.y, a.z),
            Point::new(b.x, a.y, a.z),
            Point::new(a.x, b.y, a.z),
            Point::new(b.x, b.y, a.z),
            Point::new(a.x, a.y, b.z),
            Point::new(b.x, a.y, b.z),
            Point::new(a.x, b.y, b.z),
            Point::new(b.x, b.y, b.z),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn distance_is_the_axis_gap() {
        let a = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(3.0, 0.0, 0.0), Point::new(4.0, 1.0, 1.0));
        assert_relative_eq!(a.distance(&b), 2.0);
        assert!(!a.intersects(&b));

        let c = Aabb::new(Point::new(0.5, 0.5, 0.5), Point::new(2.0, 2.0, 2.0));
        assert_relative_eq!(a.distance(&c), 0.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn translation_only_transform() {
        let a = Aabb::new(Point::origin(), Point::new(1.0, 2.0, 3.0));
        let m = Isometry::translation(1.0, -1.0, 0.5);
        let moved = a.transform_by(&m);
        assert_relative_eq!(moved.mins, Point::new(1.0, -1.0, 0.5));
        assert_relative_eq!(moved.maxs, Point::new(2.0, 1.0, 3.5));
    }
}
