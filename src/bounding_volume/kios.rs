//! Intersection-of-spheres bound.

use crate::bounding_volume::{Aabb, BoundingSphere, Obb};
use crate::math::{Isometry, Point, Real};
use arrayvec::ArrayVec;

/// A bound made of up to five spheres whose intersection contains the
/// content, plus an OBB.
///
/// The content lies inside *every* sphere, so any disjoint sphere pair
/// across two bounds separates them, and the largest pairwise sphere
/// distance is a valid distance lower bound.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub struct Kios {
    /// The spheres; between one and five of them, each containing the
    /// whole content.
    pub spheres: ArrayVec<BoundingSphere, 5>,
    /// The OBB part, used to sharpen overlap tests.
    pub obb: Obb,
}

impl Kios {
    /// Creates a new intersection-of-spheres bound.
    ///
    /// `spheres` must not be empty.
    pub fn new(spheres: ArrayVec<BoundingSphere, 5>, obb: Obb) -> Self {
        assert!(!spheres.is_empty(), "a kIOS needs at least one sphere");
        Kios { spheres, obb }
    }

    /// The single-sphere bound covering `aabb`.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let mut spheres = ArrayVec::new();
        spheres.push(aabb.bounding_sphere());
        Kios {
            spheres,
            obb: Obb::from_aabb(aabb),
        }
    }

    /// Transforms this bound by the rigid motion `m`.
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Kios {
            spheres: self.spheres.iter().map(|s| s.transform_by(m)).collect(),
            obb: self.obb.transform_by(m),
        }
    }

    /// Do the two bounds overlap?
    pub fn overlaps(&self, other: &Kios) -> bool {
        for s1 in &self.spheres {
            for s2 in &other.spheres {
                if !s1.intersects(s2) {
                    return false;
                }
            }
        }

        self.obb.overlaps(&other.obb)
    }

    /// A lower bound of the distance between the two bounds.
    pub fn distance(&self, other: &Kios) -> Real {
        let mut best: Real = 0.0;
        for s1 in &self.spheres {
            for s2 in &other.spheres {
                best = best.max(s1.distance(s2));
            }
        }
        best
    }

    /// Does this bound contain the given point?
    pub fn contains_point(&self, point: &Point) -> bool {
        self.spheres.iter().all(|s| s.contains_point(point)) && self.obb.contains_point(point)
    }

    /// The size surrogate of this bound.
    #[inline]
    pub fn size(&self) -> Real {
        self.obb.size()
    }

    /// The smallest AABB containing this bound.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.obb.aabb()
    }

    /// Enlarges this bound so it also contains `point`.
    pub fn take_point(&mut self, point: Point) {
        for sphere in &mut self.spheres {
            sphere.radius = sphere.radius.max(na::distance(&sphere.center, &point));
        }
        self.obb.take_point(point);
    }

    /// A bound enclosing both `self` and `other`.
    ///
    /// Spheres are merged pairwise (padding the shorter list with the
    /// other side's first sphere keeps every merged sphere enclosing).
    pub fn merged(&self, other: &Kios) -> Kios {
        let n = self.spheres.len().max(other.spheres.len());
        let mut spheres = ArrayVec::new();
        for i in 0..n {
            let s1 = self.spheres.get(i).unwrap_or(&self.spheres[0]);
            let s2 = other.spheres.get(i).unwrap_or(&other.spheres[0]);
            spheres.push(s1.merged(s2));
        }

        Kios {
            spheres,
            obb: self.obb.merged(&other.obb),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;

    #[test]
    fn sphere_pair_separation() {
        let a = Kios::from_aabb(&Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0)));
        let b = a.transform_by(&Isometry::translation(10.0, 0.0, 0.0));

        assert!(!a.overlaps(&b));
        // Distance is bounded by the sphere radii (sqrt(3) each).
        let d = a.distance(&b);
        assert!(d > 0.0 && d <= 10.0 - 2.0);
    }
}
