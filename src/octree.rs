//! Log-odds occupancy octrees.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};

/// Occupancy state of an octree cell, derived from its log-odds value
/// and the tree's two thresholds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Occupancy {
    /// The cell is known to be free.
    Free,
    /// The cell's occupancy is uncertain.
    Uncertain,
    /// The cell is occupied.
    Occupied,
}

/// A node of an [`Octree`].
///
/// Children are indices into the tree's node arena, `-1` when absent,
/// in the canonical octant order: bit 0 selects `+x`, bit 1 `+y`,
/// bit 2 `+z`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// The eight children, `-1` for absent octants.
    pub children: [i32; 8],
    /// The log-odds occupancy of this cell.
    pub log_odds: Real,
}

impl OctreeNode {
    fn new(log_odds: Real) -> Self {
        OctreeNode {
            children: [-1; 8],
            log_odds,
        }
    }

    /// Does this node have at least one child?
    #[inline]
    pub fn has_children(&self) -> bool {
        self.children.iter().any(|&c| c >= 0)
    }
}

/// An axis-aligned occupancy octree.
///
/// Each node covers a cubic cell; the root cell is centered at
/// `root_center` with half-extent `root_half_extent`. Per-node
/// log-odds are classified by the threshold pair into occupied, free
/// or uncertain. The log-odds of an interior node is the maximum over
/// its children, so an occupied descendant keeps every ancestor
/// occupied and pruning a free cell never hides occupied space.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    root_center: Point,
    root_half_extent: Real,
    occupied_log_odds: Real,
    free_log_odds: Real,
}

impl Octree {
    /// Creates an octree with an empty (free) root cell.
    ///
    /// The default thresholds classify positive log-odds as occupied
    /// and negative as free, leaving no uncertain band; widen them
    /// with [`Octree::set_occupancy_thresholds`].
    pub fn new(root_center: Point, root_half_extent: Real) -> Self {
        Octree {
            nodes: vec![OctreeNode::new(-1.0)],
            root_center,
            root_half_extent,
            occupied_log_odds: 0.0,
            free_log_odds: 0.0,
        }
    }

    /// Sets the classification thresholds. `occupied` must be greater
    /// than or equal to `free`; log-odds in between are uncertain.
    pub fn set_occupancy_thresholds(&mut self, occupied: Real, free: Real) {
        assert!(occupied >= free, "thresholds out of order");
        self.occupied_log_odds = occupied;
        self.free_log_odds = free;
    }

    /// The center of the root cell.
    #[inline]
    pub fn root_center(&self) -> Point {
        self.root_center
    }

    /// The half-extent of the root cell.
    #[inline]
    pub fn root_half_extent(&self) -> Real {
        self.root_half_extent
    }

    /// The root cell as an AABB, in the octree's local frame.
    pub fn root_cell(&self) -> Aabb {
        Aabb::from_half_extents(self.root_center, Vector::repeat(self.root_half_extent))
    }

    /// The node arena; the root is node 0.
    #[inline]
    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    /// The `id`-th node.
    #[inline]
    pub fn node(&self, id: i32) -> &OctreeNode {
        &self.nodes[id as usize]
    }

    /// Classifies a node by the tree's thresholds.
    pub fn occupancy(&self, node: &OctreeNode) -> Occupancy {
        if node.log_odds >= self.occupied_log_odds {
            Occupancy::Occupied
        } else if node.log_odds <= self.free_log_odds {
            Occupancy::Free
        } else {
            Occupancy::Uncertain
        }
    }

    /// Is the node occupied?
    #[inline]
    pub fn is_occupied(&self, node: &OctreeNode) -> bool {
        self.occupancy(node) == Occupancy::Occupied
    }

    /// Is the node free?
    #[inline]
    pub fn is_free(&self, node: &OctreeNode) -> bool {
        self.occupancy(node) == Occupancy::Free
    }

    /// The cell of the `octant`-th child of a node covering `cell`.
    pub fn child_cell(cell: &Aabb, octant: usize) -> Aabb {
        let half = cell.half_extents() * 0.5;
        let mut center = cell.center();
        for k in 0..3 {
            if octant & (1 << k) != 0 {
                center[k] += half[k];
            } else {
                center[k] -= half[k];
            }
        }
        Aabb::from_half_extents(center, half)
    }

    /// Subdivides down to `depth` levels below the root toward
    /// `point` and sets the reached cell's log-odds.
    ///
    /// Interior log-odds are refreshed to the maximum over the path's
    /// children. Points outside the root cell are ignored.
    pub fn update_cell(&mut self, point: &Point, depth: u32, log_odds: Real) {
        if !self.root_cell().contains_local_point(point) {
            return;
        }

        let mut path = Vec::with_capacity(depth as usize + 1);
        let mut id = 0i32;
        let mut cell = self.root_cell();
        path.push(id);

        for _ in 0..depth {
            let center = cell.center();
            let mut octant = 0;
            for k in 0..3 {
                if point[k] >= center[k] {
                    octant |= 1 << k;
                }
            }

            if self.nodes[id as usize].children[octant] < 0 {
                let child = self.nodes.len() as i32;
                self.nodes.push(OctreeNode::new(log_odds.min(-1.0)));
                self.nodes[id as usize].children[octant] = child;
            }

            id = self.nodes[id as usize].children[octant];
            cell = Self::child_cell(&cell, octant);
            path.push(id);
        }

        self.nodes[id as usize].log_odds = log_odds;

        // Propagate the max-over-children policy up the path.
        for &node in path.iter().rev().skip(1) {
            let max = self.nodes[node as usize]
                .children
                .iter()
                .filter(|&&c| c >= 0)
                .map(|&c| self.nodes[c as usize].log_odds)
                .fold(-Real::MAX, Real::max);
            self.nodes[node as usize].log_odds = max;
        }
    }

    /// Are all numeric fields of this octree finite?
    pub fn params_are_finite(&self) -> bool {
        self.root_center.coords.iter().all(|e| e.is_finite())
            && self.root_half_extent.is_finite()
            && self.root_half_extent > 0.0
            && self.nodes.iter().all(|n| n.log_odds.is_finite())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn octant_cells_follow_the_bit_convention() {
        let cell = Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0));
        let child = Octree::child_cell(&cell, 0b101);
        // bit 0 -> +x, bit 1 -> -y, bit 2 -> +z.
        assert_relative_eq!(child.center(), Point::new(0.5, -0.5, 0.5));
        assert_relative_eq!(child.half_extents(), Vector::repeat(0.5));
    }

    #[test]
    fn occupancy_propagates_to_ancestors() {
        let mut tree = Octree::new(Point::origin(), 1.0);
        assert!(tree.is_free(tree.node(0)));

        tree.update_cell(&Point::new(0.5, 0.5, 0.5), 2, 2.0);
        assert!(tree.is_occupied(tree.node(0)));

        // The sibling octants stay absent.
        let root = tree.node(0);
        assert_eq!(root.children.iter().filter(|&&c| c >= 0).count(), 1);
    }

    #[test]
    fn uncertain_band_between_the_thresholds() {
        let mut tree = Octree::new(Point::origin(), 1.0);
        tree.set_occupancy_thresholds(0.5, -0.5);
        tree.update_cell(&Point::new(-0.5, -0.5, -0.5), 1, 0.0);

        let root = tree.node(0);
        let child = tree.node(root.children[0]);
        assert_eq!(tree.occupancy(child), Occupancy::Uncertain);
    }
}
