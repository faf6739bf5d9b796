//! Request, result and contact records shared by every query.

use crate::bounding_volume::BvKind;
use crate::math::{Point, Real, UnitVector};
use crate::shape::{Shape, ShapeData};

/// The coarse family of a query object. The integer tags are
/// wire-stable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    /// Unknown object family.
    Unknown = 0,
    /// A bounding-volume hierarchy over a mesh.
    Bvh = 1,
    /// A primitive geometric shape.
    Geom = 2,
    /// An occupancy octree.
    Octree = 3,
}

/// The precise node type of a query object: its BVH bounding-volume
/// kind, or its shape kind. The integer tags are wire-stable and
/// appear in serialized contact records.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    /// Unknown node type.
    Unknown = 0,
    /// BVH with AABB bounds.
    Aabb = 1,
    /// BVH with OBB bounds.
    Obb = 2,
    /// BVH with RSS bounds.
    Rss = 3,
    /// BVH with kIOS bounds.
    Kios = 4,
    /// BVH with OBBRSS bounds.
    ObbRss = 5,
    /// BVH with 16-DOP bounds.
    Kdop16 = 6,
    /// BVH with 18-DOP bounds.
    Kdop18 = 7,
    /// BVH with 24-DOP bounds.
    Kdop24 = 8,
    /// A box shape.
    Box = 9,
    /// A sphere shape.
    Sphere = 10,
    /// A capsule shape.
    Capsule = 11,
    /// A cone shape.
    Cone = 12,
    /// A cylinder shape.
    Cylinder = 13,
    /// A convex polytope shape.
    Convex = 14,
    /// A plane shape.
    Plane = 15,
    /// A half-space shape.
    Halfspace = 16,
    /// A triangle shape.
    Triangle = 17,
    /// An occupancy octree.
    Octree = 18,
}

impl NodeType {
    /// The node type of a primitive shape.
    pub fn of_shape(shape: &Shape) -> NodeType {
        match shape.data() {
            ShapeData::Cuboid(_) => NodeType::Box,
            ShapeData::Sphere(_) => NodeType::Sphere,
            ShapeData::Capsule(_) => NodeType::Capsule,
            ShapeData::Cone(_) => NodeType::Cone,
            ShapeData::Cylinder(_) => NodeType::Cylinder,
            ShapeData::Convex(_) => NodeType::Convex,
            ShapeData::Plane(_) => NodeType::Plane,
            ShapeData::HalfSpace(_) => NodeType::Halfspace,
            ShapeData::Triangle(_) => NodeType::Triangle,
        }
    }

    /// The node type of a BVH built with the given bounding-volume
    /// kind.
    pub fn of_bv_kind(kind: BvKind) -> NodeType {
        match kind {
            BvKind::Aabb => NodeType::Aabb,
            BvKind::Obb => NodeType::Obb,
            BvKind::Rss => NodeType::Rss,
            BvKind::Kios => NodeType::Kios,
            BvKind::ObbRss => NodeType::ObbRss,
            BvKind::Kdop16 => NodeType::Kdop16,
            BvKind::Kdop18 => NodeType::Kdop18,
            BvKind::Kdop24 => NodeType::Kdop24,
        }
    }
}

/// The geometric details of a contact.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContactDetails {
    /// The contact position, in world space.
    pub pos: Point,
    /// The outward normal, pointing from the second object toward
    /// the first.
    pub normal: UnitVector,
    /// The penetration depth.
    pub depth: Real,
}

/// A single contact between two query objects.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Contact {
    /// The node type of the first object.
    pub o1: NodeType,
    /// The node type of the second object.
    pub o2: NodeType,
    /// The primitive id inside the first object, [`Contact::NONE`]
    /// when it has none.
    pub b1: i32,
    /// The primitive id inside the second object, [`Contact::NONE`]
    /// when it has none.
    pub b2: i32,
    /// Position, normal and depth, when contact details were
    /// requested.
    pub details: Option<ContactDetails>,
}

impl Contact {
    /// The primitive-id sentinel for objects without primitives.
    pub const NONE: i32 = -1;

    /// The same contact with the roles of the two objects swapped.
    pub fn flipped(self) -> Contact {
        Contact {
            o1: self.o2,
            o2: self.o1,
            b1: self.b2,
            b2: self.b1,
            details: self.details.map(|d| ContactDetails {
                pos: d.pos,
                normal: -d.normal,
                depth: d.depth,
            }),
        }
    }
}

/// Parameters of a collision query.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CollisionRequest {
    /// Stop after this many contacts have been found.
    pub max_contacts: usize,
    /// Compute contact position, normal and depth for every contact.
    pub enable_contact: bool,
    /// Report contacts between objects closer than this margin even
    /// when they do not touch.
    pub security_margin: Real,
    /// Bounding volumes closer than `security_margin + break_distance`
    /// are still broken down, so the distance lower bound stays
    /// accurate near contact.
    pub break_distance: Real,
}

impl Default for CollisionRequest {
    fn default() -> Self {
        CollisionRequest {
            max_contacts: 1,
            enable_contact: false,
            security_margin: 0.0,
            break_distance: 0.0,
        }
    }
}

impl CollisionRequest {
    /// Has the query gathered everything it was asked for?
    pub fn is_satisfied(&self, result: &CollisionResult) -> bool {
        result.contacts.len() >= self.max_contacts
    }
}

/// The accumulated outcome of a collision query.
///
/// Refined monotonically during traversal: contacts only append (up
/// to the requested cap) and the lower bound only decreases.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// The contacts found, in discovery order.
    pub contacts: Vec<Contact>,
    /// A lower bound of the distance between the two objects,
    /// meaningful when no contact was found.
    pub distance_lower_bound: Real,
}

impl Default for CollisionResult {
    fn default() -> Self {
        CollisionResult {
            contacts: Vec::new(),
            distance_lower_bound: Real::MAX,
        }
    }
}

impl CollisionResult {
    /// Did the query find at least one contact?
    #[inline]
    pub fn is_collision(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Appends a contact unless the cap was reached. Overflow is
    /// silently dropped.
    pub(crate) fn add_contact(&mut self, request: &CollisionRequest, contact: Contact) {
        if self.contacts.len() < request.max_contacts {
            self.contacts.push(contact);
        }
    }

    /// Lowers the distance lower bound.
    pub(crate) fn update_lower_bound(&mut self, bound: Real) {
        self.distance_lower_bound = self.distance_lower_bound.min(bound);
    }

    /// The same result with the roles of the two objects swapped.
    pub(crate) fn flipped(self) -> CollisionResult {
        CollisionResult {
            contacts: self.contacts.into_iter().map(Contact::flipped).collect(),
            distance_lower_bound: self.distance_lower_bound,
        }
    }
}

/// Parameters of a distance query.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DistanceRequest {
    /// Absolute tolerance on the reported distance.
    pub abs_err: Real,
    /// Relative tolerance on the reported distance.
    pub rel_err: Real,
    /// Report the signed distance (penetration depth) of overlapping
    /// pairs instead of zero.
    pub enable_signed: bool,
}

impl Default for DistanceRequest {
    fn default() -> Self {
        DistanceRequest {
            abs_err: 0.0,
            rel_err: 0.0,
            enable_signed: false,
        }
    }
}

impl DistanceRequest {
    /// Nothing can improve on a touching pair, unless the signed
    /// distance was requested.
    pub fn is_satisfied(&self, result: &DistanceResult) -> bool {
        !self.enable_signed && result.min_distance <= 0.0
    }

    /// The pruning slack of the best-first descent: a branch can be
    /// skipped when its lower bound comes within this margin of the
    /// current minimum.
    pub(crate) fn dont_care_slack(&self, min_distance: Real) -> Real {
        self.abs_err + self.rel_err * min_distance.max(0.0)
    }
}

/// The accumulated outcome of a distance query; `min_distance` only
/// ever decreases during traversal.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct DistanceResult {
    /// The smallest distance found so far.
    pub min_distance: Real,
    /// The witness points realizing `min_distance`, in world space.
    pub nearest_points: [Point; 2],
    /// The separation direction, from the second witness toward the
    /// first, when the witnesses are distinct.
    pub normal: Option<UnitVector>,
    /// The primitive ids realizing the minimum, [`Contact::NONE`]
    /// for objects without primitives.
    pub ids: [i32; 2],
}

impl Default for DistanceResult {
    fn default() -> Self {
        DistanceResult {
            min_distance: Real::MAX,
            nearest_points: [Point::origin(); 2],
            normal: None,
            ids: [Contact::NONE; 2],
        }
    }
}

impl DistanceResult {
    /// Adopts a candidate minimum if it improves on the current one.
    pub(crate) fn update(
        &mut self,
        dist: Real,
        b1: i32,
        b2: i32,
        p1: Point,
        p2: Point,
        normal: Option<UnitVector>,
    ) {
        if dist < self.min_distance {
            self.min_distance = dist;
            self.nearest_points = [p1, p2];
            self.normal = normal;
            self.ids = [b1, b2];
        }
    }

    /// The same result with the roles of the two objects swapped.
    pub(crate) fn flipped(self) -> DistanceResult {
        DistanceResult {
            min_distance: self.min_distance,
            nearest_points: [self.nearest_points[1], self.nearest_points[0]],
            normal: self.normal.map(|n| -n),
            ids: [self.ids[1], self.ids[0]],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vector;

    #[test]
    fn tags_are_wire_stable() {
        assert_eq!(ObjectType::Unknown as u8, 0);
        assert_eq!(ObjectType::Octree as u8, 3);

        assert_eq!(NodeType::Unknown as u8, 0);
        assert_eq!(NodeType::Kios as u8, 4);
        assert_eq!(NodeType::ObbRss as u8, 5);
        assert_eq!(NodeType::Kdop24 as u8, 8);
        assert_eq!(NodeType::Box as u8, 9);
        assert_eq!(NodeType::Triangle as u8, 17);
        assert_eq!(NodeType::Octree as u8, 18);
    }

    #[test]
    fn flipping_a_contact_swaps_roles() {
        let contact = Contact {
            o1: NodeType::Sphere,
            o2: NodeType::Box,
            b1: 3,
            b2: Contact::NONE,
            details: Some(ContactDetails {
                pos: Point::new(1.0, 2.0, 3.0),
                normal: Vector::z_axis(),
                depth: 0.25,
            }),
        };

        let flipped = contact.flipped();
        assert_eq!(flipped.o1, NodeType::Box);
        assert_eq!(flipped.o2, NodeType::Sphere);
        assert_eq!(flipped.b1, Contact::NONE);
        assert_eq!(flipped.b2, 3);

        let details = flipped.details.unwrap();
        assert_eq!(*details.normal, Vector::new(0.0, 0.0, -1.0));
        assert_eq!(details.depth, 0.25);
    }
}
