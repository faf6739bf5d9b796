//! Oriented bounding box.

use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Matrix, Point, Real, Vector};

/// An oriented bounding box.
///
/// The columns of `axes` form a right-handed orthonormal frame; the box
/// covers `center ± axes * half_extents`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Obb {
    /// The center of this OBB.
    pub center: Point,
    /// The orthonormal axes of this OBB (one per column).
    pub axes: Matrix,
    /// The half-extents along each axis.
    pub half_extents: Vector,
}

// Fattening applied to the absolute rotation matrix so nearly-parallel
// edge cross-products never produce a false separation.
const SAT_EPSILON: Real = 1.0e-6;

impl Obb {
    /// Creates a new OBB.
    #[inline]
    pub fn new(center: Point, axes: Matrix, half_extents: Vector) -> Self {
        Obb {
            center,
            axes,
            half_extents,
        }
    }

    /// The axis-aligned OBB equivalent to `aabb`.
    #[inline]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Obb::new(aabb.center(), Matrix::identity(), aabb.half_extents())
    }

    /// Transforms this OBB by the rigid motion `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Obb::new(
            m * self.center,
            m.rotation.to_rotation_matrix().into_inner() * self.axes,
            self.half_extents,
        )
    }

    /// The sum of the extents of this OBB, used as the descend-rule
    /// size surrogate.
    #[inline]
    pub fn size(&self) -> Real {
        self.half_extents.sum() * 2.0
    }

    /// The eight vertices of this OBB.
    pub fn vertices(&self) -> [Point; 8] {
        let mut res = [self.center; 8];
        for (i, pt) in res.iter_mut().enumerate() {
            for k in 0..3 {
                let sign = if i & (1 << k) != 0 { 1.0 } else { -1.0 };
                *pt += self.axes.column(k) * (sign * self.half_extents[k]);
            }
        }
        res
    }

    /// The smallest AABB containing this OBB.
    pub fn aabb(&self) -> Aabb {
        let ws_half_extents = self.axes.abs() * self.half_extents;
        Aabb::from_half_extents(self.center, ws_half_extents)
    }

    /// The smallest bounding sphere containing this OBB.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.half_extents.norm())
    }

    /// Does this OBB contain the given point?
    pub fn contains_point(&self, point: &Point) -> bool {
        let local = self.axes.transpose() * (point - self.center);
        (0..3).all(|i| local[i].abs() <= self.half_extents[i])
    }

    /// Do the two OBBs overlap?
    ///
    /// This is the 15-axis separating-axis test: conservative only in
    /// the sense that near-parallel edge axes are slightly fattened.
    #[inline]
    pub fn overlaps(&self, other: &Obb) -> bool {
        self.separation(other) <= 0.0
    }

    /// A lower bound of the distance between the two OBBs.
    ///
    /// Zero exactly when the separating-axis test reports an overlap.
    #[inline]
    pub fn distance(&self, other: &Obb) -> Real {
        self.separation(other).max(0.0)
    }

    /// The tightest positive separation found over the 15 candidate
    /// axes, or a value ≤ 0 if no axis separates the boxes.
    fn separation(&self, other: &Obb) -> Real {
        let ea = &self.half_extents;
        let eb = &other.half_extents;

        // Everything is expressed in the frame of `self`.
        let rot = self.axes.transpose() * other.axes;
        let t = self.axes.transpose() * (other.center - self.center);
        let abs_rot = rot.abs().add_scalar(SAT_EPSILON);

        let mut best = -Real::MAX;

        // Face axes of `self`.
        for i in 0..3 {
            let ra = ea[i];
            let rb = abs_rot.row(i).transpose().dot(eb);
            best = best.max(t[i].abs() - (ra + rb));
        }

        // Face axes of `other`.
        for j in 0..3 {
            let ra = abs_rot.column(j).dot(ea);
            let rb = eb[j];
            best = best.max(t.dot(&rot.column(j).into_owned()).abs() - (ra + rb));
        }

        // Edge-edge cross products axes[i] × other.axes[j].
        for i in 0..3 {
            let i1 = (i + 1) % 3;
            let i2 = (i + 2) % 3;
            for j in 0..3 {
                let j1 = (j + 1) % 3;
                let j2 = (j + 2) % 3;

                // |axes[i] × other.axes[j]| = sin of the angle between them.
                let axis_sq_len = 1.0 - rot[(i, j)] * rot[(i, j)];
                if axis_sq_len <= SAT_EPSILON {
                    continue;
                }

                let ra = ea[i1] * abs_rot[(i2, j)] + ea[i2] * abs_rot[(i1, j)];
                let rb = eb[j1] * abs_rot[(i, j2)] + eb[j2] * abs_rot[(i, j1)];
                let dist = (t[i2] * rot[(i1, j)] - t[i1] * rot[(i2, j)]).abs() - (ra + rb);

                // Separations along unnormalized axes are rescaled to
                // metric units so they stay valid distance lower bounds.
                best = best.max(dist / axis_sq_len.sqrt());
            }
        }

        best
    }

    /// Enlarges this OBB so it also contains `point`, keeping its
    /// axes.
    pub fn take_point(&mut self, point: Point) {
        let local = self.axes.transpose() * (point - self.center);
        let mut shift = Vector::zeros();
        for i in 0..3 {
            let lo = (-self.half_extents[i]).min(local[i]);
            let hi = self.half_extents[i].max(local[i]);
            self.half_extents[i] = (hi - lo) * 0.5;
            shift[i] = (hi + lo) * 0.5;
        }
        self.center += self.axes * shift;
    }

    /// An OBB enclosing both `self` and `other`, framed by the axes of `self`.
    pub fn merged(&self, other: &Obb) -> Obb {
        let mut mins = Vector::repeat(Real::MAX);
        let mut maxs = Vector::repeat(-Real::MAX);

        for pt in self.vertices().iter().chain(other.vertices().iter()) {
            let local = self.axes.transpose() * pt.coords;
            mins = mins.inf(&local);
            maxs = maxs.sup(&local);
        }

        let local_center = (mins + maxs) * 0.5;
        Obb::new(
            Point::from(self.axes * local_center),
            self.axes,
            (maxs - mins) * 0.5,
        )
    }
}
