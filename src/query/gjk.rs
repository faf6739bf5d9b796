//! The Gilbert-Johnson-Keerthi distance algorithm over support
//! mappings.

use crate::math::{Isometry, Point, Real, UnitVector, Vector, DIM};
use crate::shape::SupportMap;
use crate::utils;
use na::Unit;

/// The absolute tolerance used by the GJK and EPA algorithms.
pub fn eps_tol() -> Real {
    crate::math::DEFAULT_EPSILON * 100.0
}

/// A point of the configuration-space obstacle: the Minkowski
/// difference of the two query shapes.
///
/// `point` equals `orig1 - orig2`, where the originals are the
/// support points on each shape, both expressed in the local frame of
/// the first shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CsoPoint {
    /// The point on the CSO.
    pub point: Point,
    /// The support point on the first shape.
    pub orig1: Point,
    /// The support point on the second shape, in the first shape's frame.
    pub orig2: Point,
}

impl CsoPoint {
    /// Initializes a CSO point from its two originals.
    pub fn new(orig1: Point, orig2: Point) -> Self {
        CsoPoint {
            point: Point::from(orig1 - orig2),
            orig1,
            orig2,
        }
    }

    /// The support point of the CSO of `g1` and `g2` along `dir`.
    ///
    /// `pos12` is the pose of the second shape in the local frame of
    /// the first.
    pub fn from_shapes<G1, G2>(pos12: &Isometry, g1: &G1, g2: &G2, dir: &Vector) -> Self
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let sp1 = g1.local_support_point(dir);
        let sp2 = g2.support_point(pos12, &-*dir);
        CsoPoint::new(sp1, sp2)
    }
}

/// Outcome of a GJK run.
#[derive(Clone, Debug, PartialEq)]
pub enum GjkStatus {
    /// The shapes intersect: the origin lies inside the CSO.
    Intersection,
    /// The closest points were found, both expressed in the local
    /// frame of the first shape; the unit vector points from the
    /// first shape toward the second.
    ClosestPoints(Point, Point, UnitVector),
    /// The shapes are farther apart than the requested maximum
    /// distance.
    NoIntersection(UnitVector),
    /// The iteration budget was exhausted; the value is the best
    /// distance bound observed.
    IterationLimit(Real),
}

/// The working simplex of GJK: at most four CSO points together with
/// the barycentric coordinates of the latest origin projection.
#[derive(Clone, Debug)]
pub struct VoronoiSimplex {
    vertices: [CsoPoint; 4],
    coords: [Real; 4],
    dim: usize,
}

impl VoronoiSimplex {
    /// Creates a simplex initialized with a single point.
    pub fn new(pt: CsoPoint) -> Self {
        VoronoiSimplex {
            vertices: [pt; 4],
            coords: [1.0, 0.0, 0.0, 0.0],
            dim: 0,
        }
    }

    /// Resets the simplex to a single point.
    pub fn reset(&mut self, pt: CsoPoint) {
        self.vertices[0] = pt;
        self.coords = [1.0, 0.0, 0.0, 0.0];
        self.dim = 0;
    }

    /// The dimension of the simplex (number of vertices minus one).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// The `i`-th vertex of the simplex.
    #[inline]
    pub fn point(&self, i: usize) -> &CsoPoint {
        &self.vertices[i]
    }

    /// Adds a point, unless it already is a vertex of the simplex.
    pub fn add_point(&mut self, pt: CsoPoint) -> bool {
        for i in 0..=self.dim {
            if (self.vertices[i].point - pt.point).norm_squared() < eps_tol() * eps_tol() {
                return false;
            }
        }

        self.dim += 1;
        self.vertices[self.dim] = pt;
        true
    }

    /// The witness points of the latest projection, reconstructed
    /// from the barycentric coordinates.
    pub fn witness(&self) -> (Point, Point) {
        let mut p1 = Vector::zeros();
        let mut p2 = Vector::zeros();
        for i in 0..=self.dim {
            p1 += self.vertices[i].orig1.coords * self.coords[i];
            p2 += self.vertices[i].orig2.coords * self.coords[i];
        }
        (Point::from(p1), Point::from(p2))
    }

    /// Projects the origin onto the simplex and reduces it to the
    /// lowest-dimensional face supporting the projection.
    ///
    /// After the call, a full-dimensional simplex means the origin
    /// lies inside it.
    pub fn project_origin_and_reduce(&mut self) -> Point {
        match self.dim {
            0 => {
                self.coords[0] = 1.0;
                self.vertices[0].point
            }
            1 => self.project_segment(),
            2 => self.project_triangle(),
            _ => self.project_tetrahedron(),
        }
    }

    fn project_segment(&mut self) -> Point {
        let a = self.vertices[0].point;
        let b = self.vertices[1].point;
        let ab = b - a;
        let sq = ab.norm_squared();
        let t = if sq > 0.0 {
            utils::clamp(-a.coords.dot(&ab) / sq, 0.0, 1.0)
        } else {
            0.0
        };

        if t <= 0.0 {
            self.dim = 0;
            self.coords[0] = 1.0;
            a
        } else if t >= 1.0 {
            self.vertices[0] = self.vertices[1];
            self.dim = 0;
            self.coords[0] = 1.0;
            b
        } else {
            self.coords[0] = 1.0 - t;
            self.coords[1] = t;
            a + ab * t
        }
    }

    fn project_triangle(&mut self) -> Point {
        let (proj, bcoords) = utils::closest_point_triangle(
            &Point::origin(),
            &self.vertices[0].point,
            &self.vertices[1].point,
            &self.vertices[2].point,
        );
        self.reduce_to_support(&bcoords[..3]);
        proj
    }

    fn project_tetrahedron(&mut self) -> Point {
        // Faces listed with the index of their opposite vertex.
        const FACES: [([usize; 3], usize); 4] = [
            ([0, 1, 2], 3),
            ([0, 1, 3], 2),
            ([0, 2, 3], 1),
            ([1, 2, 3], 0),
        ];

        let pts = [
            self.vertices[0].point,
            self.vertices[1].point,
            self.vertices[2].point,
            self.vertices[3].point,
        ];

        let mut best: Option<(Point, [Real; 3], [usize; 3])> = None;
        let mut best_sq = Real::MAX;

        for (face, opp) in FACES {
            let [i, j, k] = face;
            let n = (pts[j] - pts[i]).cross(&(pts[k] - pts[i]));
            let interior_side = n.dot(&(pts[opp] - pts[i]));
            let origin_side = -n.dot(&pts[i].coords);

            // Candidate faces: the origin lies strictly on the outer
            // side, or the tetrahedron is flat and the face cannot
            // vouch for containment.
            if origin_side * interior_side < 0.0 || interior_side.abs() <= eps_tol() {
                let (proj, bcoords) =
                    utils::closest_point_triangle(&Point::origin(), &pts[i], &pts[j], &pts[k]);
                let sq = proj.coords.norm_squared();
                if sq < best_sq {
                    best_sq = sq;
                    best = Some((proj, bcoords, face));
                }
            }
        }

        let Some((proj, bcoords, face)) = best else {
            // Every face is non-degenerate and has the origin on its
            // inner side: keep the full simplex, the caller reads
            // this as an intersection.
            return Point::origin();
        };
        let kept = [
            self.vertices[face[0]],
            self.vertices[face[1]],
            self.vertices[face[2]],
        ];
        self.vertices[..3].copy_from_slice(&kept);
        self.dim = 2;
        self.reduce_to_support(&bcoords);
        proj
    }

    // Drops the vertices whose barycentric coordinate is zero.
    fn reduce_to_support(&mut self, bcoords: &[Real]) {
        let mut out = 0;
        for (i, &c) in bcoords.iter().enumerate() {
            if c > 0.0 {
                self.vertices[out] = self.vertices[i];
                self.coords[out] = c;
                out += 1;
            }
        }
        debug_assert!(out > 0);
        self.dim = out.saturating_sub(1);
    }
}

/// Computes the closest points between two support-mapped shapes.
///
/// `pos12` is the pose of the second shape in the first shape's local
/// frame; the `simplex` must have been seeded with one CSO point. If
/// the shapes are farther apart than `max_dist` the search stops
/// early with [`GjkStatus::NoIntersection`].
pub fn closest_points<G1, G2>(
    pos12: &Isometry,
    g1: &G1,
    g2: &G2,
    max_dist: Real,
    simplex: &mut VoronoiSimplex,
) -> GjkStatus
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let _eps_tol = eps_tol();
    let _eps_rel = _eps_tol.sqrt();

    let mut max_bound = Real::MAX;
    let mut best: Option<(Point, Point, UnitVector)> = None;
    let mut niter = 0;

    loop {
        let proj = simplex.project_origin_and_reduce();

        if simplex.dimension() == DIM {
            // Origin inside the CSO.
            return GjkStatus::Intersection;
        }

        let (dir, dist) = match Unit::try_new_and_get(-proj.coords, _eps_tol) {
            Some(res) => res,
            None => return GjkStatus::Intersection,
        };

        if dist >= max_bound {
            // Upper bound stopped improving: the previous projection
            // was already optimal within the working precision.
            let (p1, p2, dir) = best.expect("at least one GJK iteration");
            return GjkStatus::ClosestPoints(p1, p2, dir);
        }

        max_bound = dist;
        let (w1, w2) = simplex.witness();
        best = Some((w1, w2, dir));

        let support = CsoPoint::from_shapes(pos12, g1, g2, &dir);
        let min_bound = -dir.dot(&support.point.coords);

        if !min_bound.is_finite() {
            return GjkStatus::IterationLimit(max_bound);
        }

        if min_bound > max_dist {
            return GjkStatus::NoIntersection(dir);
        }

        if max_bound - min_bound <= _eps_rel * max_bound {
            // The distance is known with enough precision.
            return GjkStatus::ClosestPoints(w1, w2, dir);
        }

        if !simplex.add_point(support) {
            // The support point brought no new information.
            return GjkStatus::ClosestPoints(w1, w2, dir);
        }

        niter += 1;
        if niter == 100 {
            return GjkStatus::IterationLimit(max_bound);
        }
    }
}
