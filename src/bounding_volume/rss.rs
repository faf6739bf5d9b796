//! Rectangle-swept sphere.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Matrix, Point, Real, Vector};
use crate::utils;

/// A rectangle swept by a sphere.
///
/// The rectangle is centered at `origin`, spans `lengths[0]` along the
/// first column of `axes` and `lengths[1]` along the second; the third
/// column is the rectangle normal. The volume is every point within
/// `radius` of the rectangle.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Rss {
    /// The center of the swept rectangle.
    pub origin: Point,
    /// The orthonormal frame of the rectangle (one axis per column).
    pub axes: Matrix,
    /// The side lengths of the rectangle.
    pub lengths: [Real; 2],
    /// The sweep radius.
    pub radius: Real,
}

impl Rss {
    /// Creates a new rectangle-swept sphere.
    #[inline]
    pub fn new(origin: Point, axes: Matrix, lengths: [Real; 2], radius: Real) -> Self {
        Rss {
            origin,
            axes,
            lengths,
            radius,
        }
    }

    /// Builds the RSS covering `aabb`: the two longest sides become the
    /// rectangle, the smallest becomes the radius.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let extents = aabb.extents();
        let mut id = [0usize, 1, 2];
        // Insertion sort of the extents in decreasing order.
        for i in 1..3 {
            for j in (1..=i).rev() {
                if extents[id[j]] > extents[id[j - 1]] {
                    id.swap(j, j - 1);
                }
            }
        }

        let half = extents * 0.5;
        let radius = half[id[2]];
        let lengths = [
            (half[id[0]] - radius) * 2.0,
            (half[id[1]] - radius) * 2.0,
        ];

        let mut axes = Matrix::zeros();
        // Keep the frame right-handed: flip the first axis if the sort
        // produced a left-handed permutation.
        let left_hand = id[0] == (id[1] + 1) % 3;
        axes[(id[0], 0)] = if left_hand { -1.0 } else { 1.0 };
        axes[(id[1], 1)] = 1.0;
        axes[(id[2], 2)] = 1.0;

        Rss::new(aabb.center(), axes, lengths, radius)
    }

    /// Transforms this RSS by the rigid motion `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Rss::new(
            m * self.origin,
            m.rotation.to_rotation_matrix().into_inner() * self.axes,
            self.lengths,
            self.radius,
        )
    }

    /// The rectangle corners.
    pub fn corners(&self) -> [Point; 4] {
        let u = self.axes.column(0) * (self.lengths[0] * 0.5);
        let v = self.axes.column(1) * (self.lengths[1] * 0.5);
        [
            self.origin - u - v,
            self.origin + u - v,
            self.origin + u + v,
            self.origin - u + v,
        ]
    }

    /// The size surrogate of this RSS: rectangle diagonal plus sweep
    /// diameter.
    #[inline]
    pub fn size(&self) -> Real {
        (self.lengths[0] * self.lengths[0] + self.lengths[1] * self.lengths[1]).sqrt()
            + 2.0 * self.radius
    }

    /// The smallest AABB containing this RSS.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.corners().iter()).loosened(self.radius)
    }

    /// Does this RSS contain the given point?
    pub fn contains_point(&self, point: &Point) -> bool {
        let proj = self.project_on_rectangle(point);
        na::distance_squared(&proj, point) <= self.radius * self.radius
    }

    /// Do the two swept rectangles overlap?
    #[inline]
    pub fn overlaps(&self, other: &Rss) -> bool {
        self.rectangle_distance(other) <= self.radius + other.radius
    }

    /// The distance between the two RSS, 0.0 if they overlap.
    #[inline]
    pub fn distance(&self, other: &Rss) -> Real {
        (self.rectangle_distance(other) - self.radius - other.radius).max(0.0)
    }

    /// Projects `point` onto the rectangle (not the swept volume).
    fn project_on_rectangle(&self, point: &Point) -> Point {
        let local = self.axes.transpose() * (point - self.origin);
        let u = utils::clamp(local.x, -self.lengths[0] * 0.5, self.lengths[0] * 0.5);
        let v = utils::clamp(local.y, -self.lengths[1] * 0.5, self.lengths[1] * 0.5);
        self.origin + self.axes.column(0) * u + self.axes.column(1) * v
    }

    /// The distance between the two underlying rectangles.
    ///
    /// Covers the edge-edge, vertex-face, and crossing configurations.
    pub fn rectangle_distance(&self, other: &Rss) -> Real {
        let ca = self.corners();
        let cb = other.corners();

        if self.rectangle_crossed_by_edges(&cb) || other.rectangle_crossed_by_edges(&ca) {
            return 0.0;
        }

        let mut best = Real::MAX;

        // Edge-edge configurations.
        for i in 0..4 {
            let (a0, a1) = (&ca[i], &ca[(i + 1) % 4]);
            for j in 0..4 {
                let (b0, b1) = (&cb[j], &cb[(j + 1) % 4]);
                let (p, q) = utils::closest_points_segment_segment(a0, a1, b0, b1);
                best = best.min(na::distance(&p, &q));
            }
        }

        // Vertex-face configurations.
        for pt in &ca {
            best = best.min(na::distance(pt, &other.project_on_rectangle(pt)));
        }
        for pt in &cb {
            best = best.min(na::distance(pt, &self.project_on_rectangle(pt)));
        }

        best
    }

    // Does any of the segments of `corners` cross the interior of this
    // rectangle?
    fn rectangle_crossed_by_edges(&self, corners: &[Point; 4]) -> bool {
        let normal = self.axes.column(2);
        let hu = self.lengths[0] * 0.5;
        let hv = self.lengths[1] * 0.5;

        for i in 0..4 {
            let p = &corners[i];
            let q = &corners[(i + 1) % 4];
            let sp = normal.dot(&(p - self.origin));
            let sq = normal.dot(&(q - self.origin));

            if sp * sq >= 0.0 {
                continue;
            }

            let t = sp / (sp - sq);
            let hit = p + (q - p) * t;
            let local = self.axes.transpose() * (hit - self.origin);
            if local.x.abs() <= hu && local.y.abs() <= hv {
                return true;
            }
        }

        false
    }

    /// Enlarges this RSS so it also contains `point`, keeping its
    /// frame and growing the sweep radius for out-of-plane excess.
    pub fn take_point(&mut self, point: Point) {
        let local = self.axes.transpose() * (point - self.origin);

        let mut shift = Vector::zeros();
        for (i, len) in [local.x, local.y].into_iter().enumerate() {
            let half = self.lengths[i] * 0.5;
            let lo = (-half).min(len);
            let hi = half.max(len);
            self.lengths[i] = hi - lo;
            shift[i] = (hi + lo) * 0.5;
        }
        self.origin += self.axes * shift;
        self.radius = self.radius.max(local.z.abs());
    }

    /// An RSS enclosing both `self` and `other`.
    ///
    /// Conservative: goes through the merged enclosing AABBs.
    pub fn merged(&self, other: &Rss) -> Rss {
        Rss::from_aabb(&self.aabb().merged(&other.aabb()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn flat_rss(origin: Point) -> Rss {
        Rss::new(origin, Matrix::identity(), [2.0, 2.0], 0.5)
    }

    #[test]
    fn coplanar_rectangles() {
        let a = flat_rss(Point::origin());
        let b = flat_rss(Point::new(5.0, 0.0, 0.0));
        // Rectangles span x in [-1, 1] and [4, 6]; spheres eat 0.5 each.
        assert_relative_eq!(a.rectangle_distance(&b), 3.0, epsilon = 1.0e-9);
        assert_relative_eq!(a.distance(&b), 2.0, epsilon = 1.0e-9);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn stacked_rectangles_overlap_through_radius() {
        let a = flat_rss(Point::origin());
        let b = flat_rss(Point::new(0.0, 0.0, 0.9));
        assert_relative_eq!(a.rectangle_distance(&b), 0.9, epsilon = 1.0e-9);
        assert!(a.overlaps(&b));
        assert_relative_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn crossing_rectangles_have_zero_distance() {
        let a = flat_rss(Point::origin());
        // Rotate +90° around x so the rectangle stands in the xz plane and
        // pierces `a` through its interior.
        let mut axes = Matrix::zeros();
        axes[(0, 0)] = 1.0;
        axes[(2, 1)] = 1.0;
        axes[(1, 2)] = -1.0;
        let b = Rss::new(Point::new(0.0, 0.0, 0.0), axes, [2.0, 2.0], 0.1);

        assert_relative_eq!(a.rectangle_distance(&b), 0.0);
    }

    #[test]
    fn from_aabb_sorts_extents() {
        let aabb = Aabb::new(Point::new(-1.0, -3.0, -0.5), Point::new(1.0, 3.0, 0.5));
        let rss = Rss::from_aabb(&aabb);
        assert_relative_eq!(rss.radius, 0.5);
        assert_relative_eq!(rss.lengths[0], 5.0); // y extent 6, minus 2*radius
        assert_relative_eq!(rss.lengths[1], 1.0); // x extent 2, minus 2*radius
        // The frame stays right-handed.
        assert_relative_eq!(rss.axes.determinant(), 1.0, epsilon = 1.0e-9);
    }
}
