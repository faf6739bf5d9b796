use crate::math::{Point, UnitVector, Vector};
use crate::shape::SupportMap;
use crate::utils;

/// A triangle given by its three vertices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Triangle {
    /// The first vertex.
    pub a: Point,
    /// The second vertex.
    pub b: Point,
    /// The third vertex.
    pub c: Point,
}

impl Triangle {
    /// Creates a new triangle.
    #[inline]
    pub fn new(a: Point, b: Point, c: Point) -> Triangle {
        Triangle { a, b, c }
    }

    /// The normal of the plane supporting this triangle, oriented by
    /// the counter-clockwise winding of its vertices.
    ///
    /// Returns `None` for degenerate triangles.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector> {
        utils::ccw_face_normal([&self.a, &self.b, &self.c])
    }

    /// The vertices as an array.
    #[inline]
    pub fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// The point of this triangle closest to `pt`.
    #[inline]
    pub fn project_point(&self, pt: &Point) -> Point {
        utils::closest_point_triangle(pt, &self.a, &self.b, &self.c).0
    }
}

impl SupportMap for Triangle {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let da = self.a.coords.dot(dir);
        let db = self.b.coords.dot(dir);
        let dc = self.c.coords.dot(dir);

        if da > db {
            if da > dc {
                self.a
            } else {
                self.c
            }
        } else if db > dc {
            self.b
        } else {
            self.c
        }
    }
}
