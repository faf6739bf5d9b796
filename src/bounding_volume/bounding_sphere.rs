//! Bounding sphere.

use crate::math::{Isometry, Point, Real};

/// A bounding sphere.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct BoundingSphere {
    /// The center of this bounding sphere.
    pub center: Point,
    /// The radius of this bounding sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    #[inline]
    pub fn new(center: Point, radius: Real) -> Self {
        BoundingSphere { center, radius }
    }

    /// Does this sphere intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        na::distance_squared(&self.center, &other.center)
            <= (self.radius + other.radius) * (self.radius + other.radius)
    }

    /// The distance between this sphere and `other`, 0.0 if they intersect.
    #[inline]
    pub fn distance(&self, other: &BoundingSphere) -> Real {
        (na::distance(&self.center, &other.center) - self.radius - other.radius).max(0.0)
    }

    /// Does this sphere contain `point`?
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        na::distance_squared(&self.center, point) <= self.radius * self.radius
    }

    /// Transforms this sphere by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> BoundingSphere {
        BoundingSphere::new(m * self.center, self.radius)
    }

    /// The smallest sphere containing both `self` and `other`.
    pub fn merged(&self, other: &BoundingSphere) -> BoundingSphere {
        let dir = other.center - self.center;
        let dist = dir.norm();

        if dist + other.radius <= self.radius {
            return *self;
        }
        if dist + self.radius <= other.radius {
            return *other;
        }

        let radius = (dist + self.radius + other.radius) * 0.5;
        let center = self.center + dir * ((radius - self.radius) / dist);
        BoundingSphere::new(center, radius)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merged_encloses_both() {
        let a = BoundingSphere::new(Point::origin(), 1.0);
        let b = BoundingSphere::new(Point::new(4.0, 0.0, 0.0), 2.0);
        let m = a.merged(&b);

        assert_relative_eq!(m.radius, 3.5);
        assert_relative_eq!(m.center, Point::new(2.5, 0.0, 0.0));

        // One sphere inside the other.
        let c = BoundingSphere::new(Point::new(0.1, 0.0, 0.0), 0.2);
        assert_eq!(a.merged(&c), a);
    }
}
