//! The flat-array BVH tree and its top-down builder.

use crate::bounding_volume::{Aabb, Bv, BvKind};
use crate::math::Point;

/// A node of a [`BvhModel`].
///
/// Children are indices into the flat node array, `-1` when absent; a
/// node is a leaf exactly when both children are absent, in which
/// case `primitive` identifies the triangle it covers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BvhNode {
    /// The bounding volume enclosing everything below this node.
    pub bv: Bv,
    /// Index of the left child, `-1` for none.
    pub left: i32,
    /// Index of the right child, `-1` for none.
    pub right: i32,
    /// The triangle covered by this node, meaningful on leaves only.
    pub primitive: u32,
}

impl BvhNode {
    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left < 0 && self.right < 0
    }
}

/// An immutable BVH over the triangles of a mesh.
///
/// The tree is a flat array of nodes with the root at index 0, built
/// once and never refitted. Leaves reference triangles by index into
/// the shared vertex buffer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BvhModel {
    vertices: Vec<Point>,
    triangles: Vec<[u32; 3]>,
    nodes: Vec<BvhNode>,
    kind: BvKind,
}

impl BvhModel {
    /// Builds a BVH of the requested bounding-volume kind over the
    /// given triangle mesh.
    ///
    /// Returns `None` if the mesh is empty or references out-of-range
    /// vertices.
    pub fn new(vertices: Vec<Point>, triangles: Vec<[u32; 3]>, kind: BvKind) -> Option<Self> {
        if triangles.is_empty()
            || triangles
                .iter()
                .any(|t| t.iter().any(|&i| i as usize >= vertices.len()))
        {
            return None;
        }

        let mut model = BvhModel {
            vertices,
            triangles,
            nodes: Vec::new(),
            kind,
        };

        let mut order: Vec<u32> = (0..model.triangles.len() as u32).collect();
        let root = model.build_recursive(&mut order);
        debug_assert_eq!(root, 0);
        Some(model)
    }

    /// The bounding-volume kind used by every node of this tree.
    #[inline]
    pub fn kind(&self) -> BvKind {
        self.kind
    }

    /// The shared vertex buffer.
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The triangle index triples.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The flat node array; the root is node 0.
    #[inline]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The `id`-th node.
    #[inline]
    pub fn node(&self, id: i32) -> &BvhNode {
        &self.nodes[id as usize]
    }

    /// The three vertices of the `id`-th triangle.
    #[inline]
    pub fn triangle_points(&self, id: u32) -> [Point; 3] {
        let tri = self.triangles[id as usize];
        [
            self.vertices[tri[0] as usize],
            self.vertices[tri[1] as usize],
            self.vertices[tri[2] as usize],
        ]
    }

    /// The AABB of the whole mesh, in its local frame.
    pub fn local_aabb(&self) -> Aabb {
        self.nodes[0].bv.aabb()
    }

    // Builds the subtree covering `order` (a slice of triangle ids)
    // and returns its node index.
    fn build_recursive(&mut self, order: &mut [u32]) -> i32 {
        let id = self.nodes.len() as i32;
        let pts = self.gather_points(order);
        let bv = Bv::from_points(self.kind, &pts);
        self.nodes.push(BvhNode {
            bv,
            left: -1,
            right: -1,
            primitive: order[0],
        });

        if order.len() == 1 {
            return id;
        }

        // Median split along the longest axis of the centroid bounds.
        let mut centroid_bounds = Aabb::new_invalid();
        for &tri in order.iter() {
            centroid_bounds.take_point(self.triangle_centroid(tri));
        }
        let extents = centroid_bounds.extents();
        let axis = extents.imax();

        order.sort_by(|&a, &b| {
            let ca = self.triangle_centroid(a)[axis];
            let cb = self.triangle_centroid(b)[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = order.len() / 2;
        // NOTE: split the borrow before recursing, the node array and
        // the ordering slices are disjoint.
        let (left_order, right_order) = order.split_at_mut(mid);

        let left = self.build_recursive(left_order);
        let right = self.build_recursive(right_order);
        self.nodes[id as usize].left = left;
        self.nodes[id as usize].right = right;
        id
    }

    fn triangle_centroid(&self, tri: u32) -> Point {
        let [a, b, c] = self.triangle_points(tri);
        Point::from((a.coords + b.coords + c.coords) / 3.0)
    }

    fn gather_points(&self, order: &[u32]) -> Vec<Point> {
        let mut pts = Vec::with_capacity(order.len() * 3);
        for &tri in order {
            pts.extend_from_slice(&self.triangle_points(tri));
        }
        pts
    }

    /// Are all child indices of this tree either `-1` or valid node
    /// ids?
    pub fn topology_is_valid(&self) -> bool {
        let n = self.nodes.len() as i32;
        self.nodes
            .iter()
            .all(|node| node.left >= -1 && node.left < n && node.right >= -1 && node.right < n)
    }

    /// Are all vertex coordinates finite?
    pub fn params_are_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|p| p.coords.iter().all(|e| e.is_finite()))
    }
}

/// A unit quad in the `xy` plane split into two triangles, centered at
/// the origin; convenient for tests.
#[doc(hidden)]
pub fn unit_quad_mesh() -> (Vec<Point>, Vec<[u32; 3]>) {
    let vertices = vec![
        Point::new(-0.5, -0.5, 0.0),
        Point::new(0.5, -0.5, 0.0),
        Point::new(0.5, 0.5, 0.0),
        Point::new(-0.5, 0.5, 0.0),
    ];
    let triangles = vec![[0, 1, 2], [0, 2, 3]];
    (vertices, triangles)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Real;

    pub(crate) fn grid_mesh(n: usize) -> (Vec<Point>, Vec<[u32; 3]>) {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..=n {
            for j in 0..=n {
                vertices.push(Point::new(i as Real, j as Real, ((i * j) % 3) as Real * 0.1));
            }
        }
        let w = (n + 1) as u32;
        for i in 0..n as u32 {
            for j in 0..n as u32 {
                let v = i * w + j;
                triangles.push([v, v + 1, v + w]);
                triangles.push([v + 1, v + w + 1, v + w]);
            }
        }
        (vertices, triangles)
    }

    #[test]
    fn root_is_zero_and_leaves_cover_all_triangles() {
        let (vertices, triangles) = grid_mesh(4);
        let count = triangles.len();
        let model = BvhModel::new(vertices, triangles, BvKind::Aabb).unwrap();

        assert!(model.topology_is_valid());
        assert_eq!(model.nodes().len(), 2 * count - 1);

        let mut seen = vec![false; count];
        for node in model.nodes() {
            if node.is_leaf() {
                seen[node.primitive as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn internal_nodes_enclose_their_subtrees() {
        let (vertices, triangles) = grid_mesh(3);
        let model = BvhModel::new(vertices, triangles, BvKind::Obb).unwrap();

        fn check(model: &BvhModel, id: i32, ancestors: &[i32]) {
            let node = model.node(id);
            if node.is_leaf() {
                for pt in model.triangle_points(node.primitive) {
                    for &anc in ancestors {
                        // A drop of tolerance: fitted frames round.
                        let bv = &model.node(anc).bv;
                        assert!(
                            bv.aabb().loosened(1.0e-7).contains_local_point(&pt),
                            "node {anc} does not enclose a descendant vertex"
                        );
                    }
                }
            } else {
                let mut chain = ancestors.to_vec();
                chain.push(id);
                check(model, node.left, &chain);
                check(model, node.right, &chain);
            }
        }

        check(&model, 0, &[0]);
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let vertices = vec![Point::origin(), Point::new(1.0, 0.0, 0.0)];
        assert!(BvhModel::new(vertices, vec![[0, 1, 5]], BvKind::Aabb).is_none());
    }
}
