//! Penetration depth queries with the Expanding Polytope Algorithm.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::gjk::{self, CsoPoint, VoronoiSimplex};
use crate::shape::SupportMap;
use crate::utils;
use na::Unit;

/// A penetration reported by [`Epa`].
///
/// Everything is expressed in the local frame of the first shape; the
/// normal points from the first shape toward the second.
#[derive(Copy, Clone, Debug)]
pub struct Penetration {
    /// The contact point on the first shape.
    pub p1: Point,
    /// The contact point on the second shape.
    pub p2: Point,
    /// The minimum translation direction, from the first shape toward
    /// the second.
    pub normal: UnitVector,
    /// The penetration depth.
    pub depth: Real,
}

#[derive(Clone, Debug)]
struct Face {
    pts: [usize; 3],
    normal: UnitVector,
    dist: Real,
    deleted: bool,
}

impl Face {
    fn new(vertices: &[CsoPoint], pts: [usize; 3]) -> Option<Face> {
        let normal = utils::ccw_face_normal([
            &vertices[pts[0]].point,
            &vertices[pts[1]].point,
            &vertices[pts[2]].point,
        ])?;
        let dist = normal.dot(&vertices[pts[0]].point.coords);
        Some(Face {
            pts,
            normal,
            dist,
            deleted: false,
        })
    }
}

/// The Expanding Polytope Algorithm in three dimensions.
///
/// Starting from a GJK simplex enclosing the origin, the polytope is
/// expanded face by face until the support point along the closest
/// face's normal no longer makes progress; that face then carries the
/// penetration normal and depth.
///
/// The structure can be reused across queries to avoid allocations.
#[derive(Default)]
pub struct Epa {
    vertices: Vec<CsoPoint>,
    faces: Vec<Face>,
}

impl Epa {
    /// Creates a new EPA instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the penetration between two overlapping shapes.
    ///
    /// `simplex` is the terminal GJK simplex. Degenerate simplexes
    /// that cannot be inflated to a tetrahedron report a zero depth
    /// along the best known axis (the world `x` axis when no axis is
    /// known at all).
    pub fn penetration<G1, G2>(
        &mut self,
        pos12: &Isometry,
        g1: &G1,
        g2: &G2,
        simplex: &VoronoiSimplex,
    ) -> Option<Penetration>
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        self.vertices.clear();
        self.faces.clear();

        for i in 0..=simplex.dimension() {
            self.vertices.push(*simplex.point(i));
        }

        if !self.inflate_to_tetrahedron(pos12, g1, g2) {
            // Zero-measure CSO: depth 0 along a synthesized axis.
            let axis = self.degenerate_axis();
            let pt = self.vertices[0];
            return Some(Penetration {
                p1: pt.orig1,
                p2: pt.orig2,
                normal: axis,
                depth: 0.0,
            });
        }

        // Orient the initial tetrahedron so the faces listed below
        // wind counter-clockwise seen from outside.
        {
            let d1 = self.vertices[1].point - self.vertices[0].point;
            let d2 = self.vertices[2].point - self.vertices[0].point;
            let d3 = self.vertices[3].point - self.vertices[0].point;
            if d1.cross(&d2).dot(&d3) > 0.0 {
                self.vertices.swap(1, 2);
            }
        }

        for pts in [[0, 1, 2], [1, 3, 2], [0, 2, 3], [0, 3, 1]] {
            match Face::new(&self.vertices, pts) {
                Some(face) => self.faces.push(face),
                None => {
                    log::debug!("EPA: degenerate initial tetrahedron face");
                    return None;
                }
            }
        }

        for _ in 0..100 {
            let best = match self.closest_face() {
                Some(id) => id,
                None => {
                    log::debug!("EPA: polytope lost all of its faces");
                    return None;
                }
            };

            let normal = self.faces[best].normal;
            let dist = self.faces[best].dist;
            let support = CsoPoint::from_shapes(pos12, g1, g2, &normal);
            let progress = support.point.coords.dot(&normal) - dist;

            if progress <= gjk::eps_tol() {
                return Some(self.face_penetration(best));
            }

            if !self.expand(support) {
                // No face sees the new vertex; the polytope cannot
                // grow any further.
                return Some(self.face_penetration(best));
            }
        }

        // Out of iterations: report the best face found so far, it is
        // close enough in practice.
        log::debug!("EPA: iteration budget exhausted");
        self.closest_face().map(|id| self.face_penetration(id))
    }

    fn closest_face(&self) -> Option<usize> {
        let mut best = None;
        let mut best_dist = Real::MAX;
        for (i, face) in self.faces.iter().enumerate() {
            if !face.deleted && face.dist < best_dist {
                best_dist = face.dist;
                best = Some(i);
            }
        }
        best
    }

    // Adds `support` to the polytope: deletes every face it sees and
    // re-fans the boundary of the resulting hole. Returns false if no
    // face saw the point.
    fn expand(&mut self, support: CsoPoint) -> bool {
        let w = self.vertices.len();
        self.vertices.push(support);

        let mut boundary: Vec<(usize, usize)> = Vec::new();
        let mut any_visible = false;

        for face in &mut self.faces {
            if face.deleted {
                continue;
            }

            let sees = face
                .normal
                .dot(&(support.point - self.vertices[face.pts[0]].point))
                > 0.0;
            if sees {
                any_visible = true;
                face.deleted = true;
                for k in 0..3 {
                    let edge = (face.pts[k], face.pts[(k + 1) % 3]);
                    // An edge shared by two visible faces appears in
                    // both windings and cancels out of the boundary.
                    if let Some(pos) = boundary.iter().position(|&(a, b)| (b, a) == edge) {
                        let _ = boundary.swap_remove(pos);
                    } else {
                        boundary.push(edge);
                    }
                }
            }
        }

        if !any_visible {
            let _ = self.vertices.pop();
            return false;
        }

        let mut added = 0;
        for (a, b) in boundary {
            // The edge keeps the winding of its deleted face, so the
            // fan stays outward-oriented.
            if let Some(face) = Face::new(&self.vertices, [a, b, w]) {
                self.faces.push(face);
                added += 1;
            }
        }

        // Every replacement face was a degenerate sliver: the polytope
        // cannot be refined any further at this precision.
        added > 0
    }

    fn face_penetration(&self, id: usize) -> Penetration {
        let face = &self.faces[id];
        let [a, b, c] = face.pts;
        let (proj, bcoords) = utils::closest_point_triangle(
            &Point::origin(),
            &self.vertices[a].point,
            &self.vertices[b].point,
            &self.vertices[c].point,
        );

        let mut p1 = Vector::zeros();
        let mut p2 = Vector::zeros();
        for (i, &vid) in face.pts.iter().enumerate() {
            p1 += self.vertices[vid].orig1.coords * bcoords[i];
            p2 += self.vertices[vid].orig2.coords * bcoords[i];
        }

        Penetration {
            p1: Point::from(p1),
            p2: Point::from(p2),
            normal: face.normal,
            depth: proj.coords.norm(),
        }
    }

    // Expands a sub-dimensional starting simplex into a tetrahedron by
    // sampling supports along directions orthogonal to it.
    fn inflate_to_tetrahedron<G1, G2>(&mut self, pos12: &Isometry, g1: &G1, g2: &G2) -> bool
    where
        G1: ?Sized + SupportMap,
        G2: ?Sized + SupportMap,
    {
        let mut guard = 0;
        while self.vertices.len() < 4 && guard < 12 {
            guard += 1;
            let dir = match self.vertices.len() {
                1 => Vector::x(),
                2 => {
                    let d = self.vertices[1].point - self.vertices[0].point;
                    pick_orthogonal(&d, guard)
                }
                _ => {
                    let d1 = self.vertices[1].point - self.vertices[0].point;
                    let d2 = self.vertices[2].point - self.vertices[0].point;
                    let n = d1.cross(&d2);
                    if n.norm_squared() <= gjk::eps_tol() {
                        pick_orthogonal(&d1, guard)
                    } else if guard % 2 == 0 {
                        n
                    } else {
                        -n
                    }
                }
            };

            let support = CsoPoint::from_shapes(pos12, g1, g2, &dir);
            if self
                .vertices
                .iter()
                .all(|v| (v.point - support.point).norm_squared() > gjk::eps_tol() * gjk::eps_tol())
            {
                // Reject points affinely dependent on the current set.
                if self.vertices.len() == 3 {
                    let d1 = self.vertices[1].point - self.vertices[0].point;
                    let d2 = self.vertices[2].point - self.vertices[0].point;
                    let d3 = support.point - self.vertices[0].point;
                    if d1.cross(&d2).dot(&d3).abs() <= gjk::eps_tol() {
                        continue;
                    }
                }
                self.vertices.push(support);
            } else if self.vertices.len() == 1 {
                // A singleton CSO; try the opposite direction once.
                let support = CsoPoint::from_shapes(pos12, g1, g2, &(-dir));
                if (self.vertices[0].point - support.point).norm_squared()
                    > gjk::eps_tol() * gjk::eps_tol()
                {
                    self.vertices.push(support);
                }
            }
        }

        self.vertices.len() == 4
    }

    // The best separating axis recoverable from a degenerate vertex
    // set, the world x axis if none.
    fn degenerate_axis(&self) -> UnitVector {
        if self.vertices.len() >= 3 {
            let d1 = self.vertices[1].point - self.vertices[0].point;
            let d2 = self.vertices[2].point - self.vertices[0].point;
            if let Some(n) = Unit::try_new(d1.cross(&d2), gjk::eps_tol()) {
                return n;
            }
        }
        if self.vertices.len() >= 2 {
            let d = self.vertices[1].point - self.vertices[0].point;
            if let Some(n) = Unit::try_new(pick_orthogonal(&d, 0), gjk::eps_tol()) {
                return n;
            }
        }
        Vector::x_axis()
    }
}

// A vector orthogonal to `d`, varied by `salt` so repeated attempts
// explore different directions.
fn pick_orthogonal(d: &Vector, salt: usize) -> Vector {
    let candidate = if salt % 2 == 0 {
        d.cross(&Vector::x())
    } else {
        d.cross(&Vector::y())
    };

    if candidate.norm_squared() > gjk::eps_tol() {
        candidate
    } else {
        d.cross(&Vector::z())
    }
}
