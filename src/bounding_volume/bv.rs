//! The closed tagged union over all bounding-volume kinds.

use crate::bounding_volume::{Aabb, BoundingSphere, Kdop, Kios, Obb, ObbRss, Rss};
use crate::math::{Isometry, Matrix, Point, Real, Vector};
use arrayvec::ArrayVec;

/// The bounding-volume families supported by BVH trees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BvKind {
    /// Axis-aligned bounding box.
    Aabb,
    /// Oriented bounding box.
    Obb,
    /// Rectangle-swept sphere.
    Rss,
    /// OBB + RSS composite.
    ObbRss,
    /// Intersection of spheres + OBB.
    Kios,
    /// 16-DOP.
    Kdop16,
    /// 18-DOP.
    Kdop18,
    /// 24-DOP.
    Kdop24,
}

/// A bounding volume of any of the supported kinds.
///
/// Trees use a single kind throughout; pairwise operations on
/// mismatched kinds conservatively fall back to the enclosing AABBs
/// (and are a bug in debug builds).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Bv {
    /// Axis-aligned bounding box.
    Aabb(Aabb),
    /// Oriented bounding box.
    Obb(Obb),
    /// Rectangle-swept sphere.
    Rss(Rss),
    /// OBB + RSS composite.
    ObbRss(ObbRss),
    /// Intersection of spheres + OBB.
    Kios(Kios),
    /// 16-DOP.
    Kdop16(Kdop<8>),
    /// 18-DOP.
    Kdop18(Kdop<9>),
    /// 24-DOP.
    Kdop24(Kdop<12>),
}

impl Bv {
    /// The kind tag of this bounding volume.
    pub fn kind(&self) -> BvKind {
        match self {
            Bv::Aabb(_) => BvKind::Aabb,
            Bv::Obb(_) => BvKind::Obb,
            Bv::Rss(_) => BvKind::Rss,
            Bv::ObbRss(_) => BvKind::ObbRss,
            Bv::Kios(_) => BvKind::Kios,
            Bv::Kdop16(_) => BvKind::Kdop16,
            Bv::Kdop18(_) => BvKind::Kdop18,
            Bv::Kdop24(_) => BvKind::Kdop24,
        }
    }

    /// The smallest AABB enclosing this bounding volume, in the same
    /// frame.
    pub fn aabb(&self) -> Aabb {
        match self {
            Bv::Aabb(bv) => *bv,
            Bv::Obb(bv) => bv.aabb(),
            Bv::Rss(bv) => bv.aabb(),
            Bv::ObbRss(bv) => bv.aabb(),
            Bv::Kios(bv) => bv.aabb(),
            Bv::Kdop16(bv) => bv.aabb(),
            Bv::Kdop18(bv) => bv.aabb(),
            Bv::Kdop24(bv) => bv.aabb(),
        }
    }

    /// The center of this bounding volume.
    pub fn center(&self) -> Point {
        match self {
            Bv::Aabb(bv) => bv.center(),
            Bv::Obb(bv) => bv.center,
            Bv::Rss(bv) => bv.origin,
            Bv::ObbRss(bv) => bv.obb.center,
            Bv::Kios(bv) => bv.obb.center,
            _ => self.aabb().center(),
        }
    }

    /// The canonical size surrogate driving the descend rule.
    pub fn size(&self) -> Real {
        match self {
            Bv::Aabb(bv) => bv.size(),
            Bv::Obb(bv) => bv.size(),
            Bv::Rss(bv) => bv.size(),
            Bv::ObbRss(bv) => bv.size(),
            Bv::Kios(bv) => bv.size(),
            Bv::Kdop16(bv) => bv.size(),
            Bv::Kdop18(bv) => bv.size(),
            Bv::Kdop24(bv) => bv.size(),
        }
    }

    /// Does this bounding volume contain the given point?
    pub fn contains_point(&self, point: &Point) -> bool {
        match self {
            Bv::Aabb(bv) => bv.contains_local_point(point),
            Bv::Obb(bv) => bv.contains_point(point),
            Bv::Rss(bv) => bv.contains_point(point),
            Bv::ObbRss(bv) => bv.contains_point(point),
            Bv::Kios(bv) => bv.contains_point(point),
            Bv::Kdop16(bv) => bv.contains_point(point),
            Bv::Kdop18(bv) => bv.contains_point(point),
            Bv::Kdop24(bv) => bv.contains_point(point),
        }
    }

    /// Do the two bounding volumes overlap?
    pub fn overlaps(&self, other: &Bv) -> bool {
        match (self, other) {
            (Bv::Aabb(a), Bv::Aabb(b)) => a.intersects(b),
            (Bv::Obb(a), Bv::Obb(b)) => a.overlaps(b),
            (Bv::Rss(a), Bv::Rss(b)) => a.overlaps(b),
            (Bv::ObbRss(a), Bv::ObbRss(b)) => a.overlaps(b),
            (Bv::Kios(a), Bv::Kios(b)) => a.overlaps(b),
            (Bv::Kdop16(a), Bv::Kdop16(b)) => a.overlaps(b),
            (Bv::Kdop18(a), Bv::Kdop18(b)) => a.overlaps(b),
            (Bv::Kdop24(a), Bv::Kdop24(b)) => a.overlaps(b),
            _ => {
                debug_assert!(false, "bounding-volume kind mismatch");
                self.aabb().intersects(&other.aabb())
            }
        }
    }

    /// The distance between the two bounding volumes: a lower bound of
    /// the distance between their contents, zero iff they overlap.
    pub fn distance(&self, other: &Bv) -> Real {
        match (self, other) {
            (Bv::Aabb(a), Bv::Aabb(b)) => a.distance(b),
            (Bv::Obb(a), Bv::Obb(b)) => a.distance(b),
            (Bv::Rss(a), Bv::Rss(b)) => a.distance(b),
            (Bv::ObbRss(a), Bv::ObbRss(b)) => a.distance(b),
            (Bv::Kios(a), Bv::Kios(b)) => a.distance(b),
            (Bv::Kdop16(a), Bv::Kdop16(b)) => a.distance(b),
            (Bv::Kdop18(a), Bv::Kdop18(b)) => a.distance(b),
            (Bv::Kdop24(a), Bv::Kdop24(b)) => a.distance(b),
            _ => {
                debug_assert!(false, "bounding-volume kind mismatch");
                self.aabb().distance(&other.aabb())
            }
        }
    }

    /// Transforms this bounding volume by the rigid motion `m`,
    /// keeping its kind.
    ///
    /// Exact for the oriented kinds; k-DOPs and AABBs are refitted
    /// around their transformed corners (conservative).
    pub fn transform_by(&self, m: &Isometry) -> Bv {
        match self {
            Bv::Aabb(bv) => Bv::Aabb(bv.transform_by(m)),
            Bv::Obb(bv) => Bv::Obb(bv.transform_by(m)),
            Bv::Rss(bv) => Bv::Rss(bv.transform_by(m)),
            Bv::ObbRss(bv) => Bv::ObbRss(bv.transform_by(m)),
            Bv::Kios(bv) => Bv::Kios(bv.transform_by(m)),
            Bv::Kdop16(bv) => Bv::Kdop16(transform_kdop(bv, m)),
            Bv::Kdop18(bv) => Bv::Kdop18(transform_kdop(bv, m)),
            Bv::Kdop24(bv) => Bv::Kdop24(transform_kdop(bv, m)),
        }
    }

    /// The smallest bounding sphere of this volume.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Bv::Obb(bv) => bv.bounding_sphere(),
            Bv::ObbRss(bv) => bv.obb.bounding_sphere(),
            Bv::Kios(bv) => bv.obb.bounding_sphere(),
            _ => self.aabb().bounding_sphere(),
        }
    }

    /// Enlarges this bounding volume so it also contains `point`.
    pub fn take_point(&mut self, point: Point) {
        match self {
            Bv::Aabb(bv) => bv.take_point(point),
            Bv::Obb(bv) => bv.take_point(point),
            Bv::Rss(bv) => bv.take_point(point),
            Bv::ObbRss(bv) => bv.take_point(point),
            Bv::Kios(bv) => bv.take_point(point),
            Bv::Kdop16(bv) => bv.take_point(point),
            Bv::Kdop18(bv) => bv.take_point(point),
            Bv::Kdop24(bv) => bv.take_point(point),
        }
    }

    /// Enlarges this bounding volume so it also contains the given
    /// triangle.
    pub fn take_triangle(&mut self, a: Point, b: Point, c: Point) {
        self.take_point(a);
        self.take_point(b);
        self.take_point(c);
    }

    /// A bounding volume of the same kind enclosing both operands.
    pub fn merged(&self, other: &Bv) -> Bv {
        match (self, other) {
            (Bv::Aabb(a), Bv::Aabb(b)) => Bv::Aabb(a.merged(b)),
            (Bv::Obb(a), Bv::Obb(b)) => Bv::Obb(a.merged(b)),
            (Bv::Rss(a), Bv::Rss(b)) => Bv::Rss(a.merged(b)),
            (Bv::ObbRss(a), Bv::ObbRss(b)) => Bv::ObbRss(a.merged(b)),
            (Bv::Kios(a), Bv::Kios(b)) => Bv::Kios(a.merged(b)),
            (Bv::Kdop16(a), Bv::Kdop16(b)) => Bv::Kdop16(a.merged(b)),
            (Bv::Kdop18(a), Bv::Kdop18(b)) => Bv::Kdop18(a.merged(b)),
            (Bv::Kdop24(a), Bv::Kdop24(b)) => Bv::Kdop24(a.merged(b)),
            _ => {
                debug_assert!(false, "bounding-volume kind mismatch");
                Bv::Aabb(self.aabb().merged(&other.aabb()))
            }
        }
    }

    /// Fits a bounding volume of the requested kind around a set of
    /// points.
    pub fn from_points(kind: BvKind, pts: &[Point]) -> Bv {
        match kind {
            BvKind::Aabb => Bv::Aabb(Aabb::from_points(pts)),
            BvKind::Obb => Bv::Obb(fit_obb(pts)),
            BvKind::Rss => Bv::Rss(fit_rss(pts)),
            BvKind::ObbRss => Bv::ObbRss(ObbRss {
                obb: fit_obb(pts),
                rss: fit_rss(pts),
            }),
            BvKind::Kios => Bv::Kios(fit_kios(pts)),
            BvKind::Kdop16 => Bv::Kdop16(Kdop::from_points(pts)),
            BvKind::Kdop18 => Bv::Kdop18(Kdop::from_points(pts)),
            BvKind::Kdop24 => Bv::Kdop24(Kdop::from_points(pts)),
        }
    }
}

fn transform_kdop<const HALF: usize>(kdop: &Kdop<HALF>, m: &Isometry) -> Kdop<HALF> {
    let corners = kdop.aabb().vertices().map(|pt| m * pt);
    Kdop::from_points(corners.iter())
}

/// The eigenframe of the covariance matrix of `pts`, columns sorted by
/// decreasing spread and flipped into a right-handed basis.
fn covariance_frame(pts: &[Point]) -> Matrix {
    if pts.len() < 2 {
        return Matrix::identity();
    }

    let n = pts.len() as Real;
    let mean = pts.iter().fold(Vector::zeros(), |acc, p| acc + p.coords) / n;
    let mut cov = Matrix::zeros();
    for pt in pts {
        let d = pt.coords - mean;
        cov += d * d.transpose();
    }
    cov /= n;

    let eig = cov.symmetric_eigen();
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eig.eigenvalues[b]
            .partial_cmp(&eig.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let c0 = eig.eigenvectors.column(order[0]).into_owned();
    let c1 = eig.eigenvectors.column(order[1]).into_owned();
    let mut c2 = eig.eigenvectors.column(order[2]).into_owned();

    // Right-handed frame.
    if c0.cross(&c1).dot(&c2) < 0.0 {
        c2 = -c2;
    }

    Matrix::from_columns(&[c0, c1, c2])
}

// Support intervals of `pts` along the columns of `axes`.
fn frame_extents(axes: &Matrix, pts: &[Point]) -> (Vector, Vector) {
    let mut mins = Vector::repeat(Real::MAX);
    let mut maxs = Vector::repeat(-Real::MAX);
    for pt in pts {
        let local = axes.transpose() * pt.coords;
        mins = mins.inf(&local);
        maxs = maxs.sup(&local);
    }
    (mins, maxs)
}

fn fit_obb(pts: &[Point]) -> Obb {
    let axes = covariance_frame(pts);
    let (mins, maxs) = frame_extents(&axes, pts);
    let center = axes * ((mins + maxs) * 0.5);
    Obb::new(Point::from(center), axes, (maxs - mins) * 0.5)
}

fn fit_rss(pts: &[Point]) -> Rss {
    let axes = covariance_frame(pts);
    let (mins, maxs) = frame_extents(&axes, pts);
    let half = (maxs - mins) * 0.5;
    let origin = axes * ((mins + maxs) * 0.5);
    Rss::new(
        Point::from(origin),
        axes,
        [half.x * 2.0, half.y * 2.0],
        half.z,
    )
}

fn fit_kios(pts: &[Point]) -> Kios {
    let obb = fit_obb(pts);

    let mut centers = ArrayVec::<Point, 5>::new();
    centers.push(obb.center);
    for k in 0..2 {
        let he = obb.half_extents[k];
        if he > Real::EPSILON.sqrt() {
            let offset = obb.axes.column(k) * (he * 0.5);
            centers.push(obb.center + offset);
            centers.push(obb.center - offset);
        }
    }

    let spheres = centers
        .iter()
        .map(|c| {
            let radius = pts
                .iter()
                .map(|p| na::distance(c, p))
                .fold(0.0, Real::max);
            BoundingSphere::new(*c, radius)
        })
        .collect();

    Kios::new(spheres, obb)
}

#[cfg(test)]
mod test {
    use super::*;

    fn slanted_points() -> Vec<Point> {
        // A flat, elongated cloud along the (1, 1, 0) diagonal.
        let dir = Vector::new(1.0, 1.0, 0.0).normalize();
        let side = Vector::new(-1.0, 1.0, 0.0).normalize();
        let mut pts = Vec::new();
        for i in 0..20 {
            let t = i as Real / 19.0;
            pts.push(Point::from(dir * (t * 10.0) + side * (t * 0.5).sin() * 0.2));
            pts.push(Point::from(dir * (t * 10.0) - side * 0.2 + Vector::z() * 0.1));
        }
        pts
    }

    #[test]
    fn fitted_volumes_enclose_their_points() {
        let pts = slanted_points();
        for kind in [
            BvKind::Aabb,
            BvKind::Obb,
            BvKind::Rss,
            BvKind::ObbRss,
            BvKind::Kios,
            BvKind::Kdop16,
            BvKind::Kdop18,
            BvKind::Kdop24,
        ] {
            let bv = Bv::from_points(kind, &pts);
            for pt in &pts {
                // A hair of slack for the round-trip through the frame.
                let inflated = match &bv {
                    Bv::Rss(rss) => {
                        let mut r = *rss;
                        r.radius += 1.0e-9;
                        Bv::Rss(r)
                    }
                    other => other.clone(),
                };
                assert!(
                    inflated.contains_point(pt) || bv.aabb().loosened(1.0e-9).contains_local_point(pt),
                    "{kind:?} lost a point"
                );
            }
        }
    }

    #[test]
    fn growing_by_points_keeps_enclosure() {
        let pts = slanted_points();
        let (seed, rest) = pts.split_at(3);

        for kind in [
            BvKind::Aabb,
            BvKind::Obb,
            BvKind::Rss,
            BvKind::ObbRss,
            BvKind::Kios,
            BvKind::Kdop16,
            BvKind::Kdop18,
            BvKind::Kdop24,
        ] {
            let mut bv = Bv::from_points(kind, seed);
            for chunk in rest.chunks(3) {
                if let [a, b, c] = chunk {
                    bv.take_triangle(*a, *b, *c);
                } else {
                    for pt in chunk {
                        bv.take_point(*pt);
                    }
                }
            }

            for pt in &pts {
                assert!(
                    bv.aabb().loosened(1.0e-7).contains_local_point(pt),
                    "{kind:?} lost a point while growing"
                );
            }
        }
    }

    #[test]
    fn obb_is_tighter_than_aabb_on_diagonal_content() {
        let pts = slanted_points();
        let obb = fit_obb(&pts);
        let aabb = Aabb::from_points(&pts);
        assert!(obb.half_extents.product() * 8.0 < aabb.extents().product() * 0.5);
    }
}
