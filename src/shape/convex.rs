use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A convex polytope.
///
/// Faces are stored as a flat run-length encoded buffer: for each
/// face, the number of vertices followed by that many indices into
/// the vertex buffer, in counter-clockwise order when seen from
/// outside.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct ConvexPolyhedron {
    points: Vec<Point>,
    polygons: Vec<u32>,
    num_polygons: usize,
    edges: Vec<(u32, u32)>,
    center: Point,
}

impl ConvexPolyhedron {
    /// Creates a new convex polytope from its vertices and the flat
    /// run-length encoded face buffer.
    ///
    /// Returns `None` if the buffer is malformed or references
    /// out-of-range vertices.
    pub fn new(points: Vec<Point>, polygons: Vec<u32>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        // Walk the run-length encoding once to count faces and check
        // the indices.
        let mut num_polygons = 0;
        let mut cursor = 0;
        while cursor < polygons.len() {
            let n = polygons[cursor] as usize;
            if n < 3 || cursor + 1 + n > polygons.len() {
                return None;
            }
            if polygons[cursor + 1..cursor + 1 + n]
                .iter()
                .any(|&i| i as usize >= points.len())
            {
                return None;
            }
            num_polygons += 1;
            cursor += n + 1;
        }

        let center = Point::from(
            points.iter().fold(Vector::zeros(), |acc, p| acc + p.coords) / points.len() as Real,
        );

        let mut result = ConvexPolyhedron {
            points,
            polygons,
            num_polygons,
            edges: Vec::new(),
            center,
        };
        result.fill_edges();
        Some(result)
    }

    /// The vertex buffer of this polytope.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The raw run-length encoded face buffer.
    #[inline]
    pub fn polygons(&self) -> &[u32] {
        &self.polygons
    }

    /// The number of faces.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.num_polygons
    }

    /// The unique edges of this polytope, as vertex index pairs.
    #[inline]
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// A point guaranteed to lie inside the polytope.
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Iterates over the faces, yielding `(face_index, vertex_indices)`.
    pub fn faces(&self) -> Faces<'_> {
        Faces {
            polygons: &self.polygons,
            cursor: 0,
            face: 0,
        }
    }

    fn fill_edges(&mut self) {
        let mut edges = Vec::new();
        for (_, vertices) in self.faces() {
            for k in 0..vertices.len() {
                let i = vertices[k];
                let j = vertices[(k + 1) % vertices.len()];
                edges.push((i.min(j), i.max(j)));
            }
        }
        edges.sort_unstable();
        edges.dedup();
        self.edges = edges;
    }
}

/// Iterator over the faces of a [`ConvexPolyhedron`].
pub struct Faces<'a> {
    polygons: &'a [u32],
    cursor: usize,
    face: usize,
}

impl<'a> Iterator for Faces<'a> {
    type Item = (usize, &'a [u32]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.polygons.len() {
            return None;
        }

        let n = self.polygons[self.cursor] as usize;
        let vertices = &self.polygons[self.cursor + 1..self.cursor + 1 + n];
        let face = self.face;
        self.cursor += n + 1;
        self.face += 1;
        Some((face, vertices))
    }
}

impl SupportMap for ConvexPolyhedron {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let mut best = 0;
        let mut best_dot = -Real::MAX;

        for (i, pt) in self.points.iter().enumerate() {
            let dot = pt.coords.dot(dir);
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }

        self.points[best]
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// An axis-aligned cube of the given half side, as a polytope.
    pub(crate) fn cube(half: Real) -> ConvexPolyhedron {
        let h = half;
        let points = vec![
            Point::new(-h, -h, -h), // 0
            Point::new(h, -h, -h),  // 1
            Point::new(h, h, -h),   // 2
            Point::new(-h, h, -h),  // 3
            Point::new(-h, -h, h),  // 4
            Point::new(h, -h, h),   // 5
            Point::new(h, h, h),    // 6
            Point::new(-h, h, h),   // 7
        ];
        #[rustfmt::skip]
        let polygons = vec![
            4, 0, 3, 2, 1, // -z
            4, 4, 5, 6, 7, // +z
            4, 0, 1, 5, 4, // -y
            4, 2, 3, 7, 6, // +y
            4, 1, 2, 6, 5, // +x
            4, 0, 4, 7, 3, // -x
        ];
        ConvexPolyhedron::new(points, polygons).unwrap()
    }

    #[test]
    fn face_iteration_and_edges() {
        let cube = cube(1.0);
        assert_eq!(cube.num_polygons(), 6);
        assert_eq!(cube.faces().count(), 6);
        assert_eq!(cube.edges().len(), 12);

        let (face, verts) = cube.faces().nth(4).unwrap();
        assert_eq!(face, 4);
        assert_eq!(verts, &[1, 2, 6, 5]);
    }

    #[test]
    fn rejects_malformed_buffers() {
        let points = vec![Point::origin(), Point::new(1.0, 0.0, 0.0)];
        assert!(ConvexPolyhedron::new(points.clone(), vec![3, 0, 1, 7]).is_none());
        assert!(ConvexPolyhedron::new(points, vec![3, 0, 1]).is_none());
    }

    #[test]
    fn support_points_are_vertices() {
        let cube = cube(2.0);
        let s = cube.local_support_point(&Vector::new(1.0, 1.0, 1.0));
        assert_relative_eq!(s, Point::new(2.0, 2.0, 2.0));
    }
}
