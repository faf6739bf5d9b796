//! Query objects and the `collide`/`distance` entry points.

use crate::bounding_volume::Aabb;
use crate::bvh::BvhModel;
use crate::math::{Isometry, DEFAULT_EPSILON};
use crate::octree::Octree;
use crate::query::{self, QueryError};
use crate::shape::Shape;
use crate::traversal::types::{
    CollisionRequest, CollisionResult, Contact, DistanceRequest, DistanceResult, NodeType,
    ObjectType,
};
use crate::traversal::{mesh, octree};
use std::sync::Arc;

/// A geometry usable in queries: a triangle-mesh BVH, an occupancy
/// octree, or a primitive shape.
///
/// Geometries are immutable once built and may be shared between
/// objects and across threads.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// A bounding-volume hierarchy over a triangle mesh.
    Bvh(BvhModel),
    /// An occupancy octree.
    Octree(Octree),
    /// A primitive shape.
    Shape(Shape),
}

impl Geometry {
    /// The coarse family tag of this geometry.
    pub fn object_type(&self) -> ObjectType {
        match self {
            Geometry::Bvh(_) => ObjectType::Bvh,
            Geometry::Octree(_) => ObjectType::Octree,
            Geometry::Shape(_) => ObjectType::Geom,
        }
    }

    /// The precise node-type tag of this geometry.
    pub fn node_type(&self) -> NodeType {
        match self {
            Geometry::Bvh(m) => NodeType::of_bv_kind(m.kind()),
            Geometry::Octree(_) => NodeType::Octree,
            Geometry::Shape(s) => NodeType::of_shape(s),
        }
    }

    /// The AABB of this geometry in its local frame.
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Geometry::Bvh(m) => m.local_aabb(),
            Geometry::Octree(o) => o.root_cell(),
            Geometry::Shape(s) => *s.local_aabb(),
        }
    }
}

/// A shared-ownership handle to an immutable [`Geometry`].
pub type SharedGeometry = Arc<Geometry>;

/// A geometry posed in the world: the pairing consumed by the broad
/// phase.
///
/// The world AABB is recomputed on demand, never cached inside the
/// geometry.
#[derive(Debug, Clone)]
pub struct CollisionObject {
    /// The shared geometry of this object.
    pub geometry: SharedGeometry,
    /// The pose of the geometry in the world.
    pub position: Isometry,
}

impl CollisionObject {
    /// Creates a new posed object.
    pub fn new(geometry: SharedGeometry, position: Isometry) -> Self {
        CollisionObject { geometry, position }
    }

    /// The world-space AABB of this object at its current pose.
    pub fn world_aabb(&self) -> Aabb {
        compute_world_aabb(&self.geometry, &self.position)
    }
}

/// Computes the world-space AABB of a posed geometry.
pub fn compute_world_aabb(geometry: &Geometry, tf: &Isometry) -> Aabb {
    geometry.local_aabb().transform_by(tf)
}

fn validate_transform(tf: &Isometry) -> Result<(), QueryError> {
    let finite = tf.translation.vector.iter().all(|e| e.is_finite())
        && tf.rotation.coords.iter().all(|e| e.is_finite());
    if !finite {
        return Err(QueryError::InvalidGeometry("non-finite transform"));
    }
    if (tf.rotation.norm() - 1.0).abs() > DEFAULT_EPSILON.sqrt() {
        return Err(QueryError::InvalidGeometry("non-unit rotation"));
    }
    Ok(())
}

fn validate_geometry(geometry: &Geometry) -> Result<(), QueryError> {
    match geometry {
        Geometry::Bvh(m) => {
            if !m.params_are_finite() {
                return Err(QueryError::InvalidGeometry("non-finite mesh vertex"));
            }
            if !m.topology_is_valid() {
                return Err(QueryError::InvalidGeometry("invalid BVH child index"));
            }
        }
        Geometry::Octree(o) => {
            if !o.params_are_finite() {
                return Err(QueryError::InvalidGeometry("non-finite octree"));
            }
        }
        Geometry::Shape(s) => {
            if !s.params_are_finite() {
                return Err(QueryError::InvalidGeometry("non-finite shape parameter"));
            }
        }
    }
    Ok(())
}

fn validate_query(
    g1: &Geometry,
    t1: &Isometry,
    g2: &Geometry,
    t2: &Isometry,
) -> Result<(), QueryError> {
    validate_transform(t1)?;
    validate_transform(t2)?;
    validate_geometry(g1)?;
    validate_geometry(g2)?;
    Ok(())
}

/// Decides whether two posed geometries intersect.
///
/// Contacts accumulate into the result up to
/// `request.max_contacts`; when no contact exists the result carries
/// a lower bound of the separation distance.
pub fn collide(
    g1: &Geometry,
    t1: &Isometry,
    g2: &Geometry,
    t2: &Isometry,
    request: &CollisionRequest,
) -> Result<CollisionResult, QueryError> {
    validate_query(g1, t1, g2, t2)?;

    let mut result = CollisionResult::default();

    match (g1, g2) {
        (Geometry::Shape(s1), Geometry::Shape(s2)) => {
            let contact = query::shape_contact(s1, t1, s2, t2)?;
            mesh::register_leaf_contact(
                request,
                &mut result,
                &contact,
                NodeType::of_shape(s1),
                NodeType::of_shape(s2),
                Contact::NONE,
                Contact::NONE,
            );
        }
        (Geometry::Bvh(m1), Geometry::Bvh(m2)) => mesh::collide_bvh_bvh(m1, t1, m2, t2, request, &mut result)?,
        (Geometry::Bvh(m1), Geometry::Shape(s2)) => mesh::collide_bvh_shape(m1, t1, s2, t2, request, &mut result)?,
        (Geometry::Shape(_), Geometry::Bvh(_)) => return collide(g2, t2, g1, t1, request).map(CollisionResult::flipped),
        (Geometry::Octree(o1), Geometry::Octree(o2)) => {
            octree::collide_octree_octree(o1, t1, o2, t2, request, &mut result)?
        }
        (Geometry::Octree(o1), Geometry::Bvh(m2)) => octree::collide_octree_bvh(o1, t1, m2, t2, request, &mut result)?,
        (Geometry::Bvh(_), Geometry::Octree(_)) => {
            return collide(g2, t2, g1, t1, request).map(CollisionResult::flipped)
        }
        (Geometry::Octree(o1), Geometry::Shape(s2)) => {
            octree::collide_octree_shape(o1, t1, s2, t2, request, &mut result)?
        }
        (Geometry::Shape(_), Geometry::Octree(_)) => {
            return collide(g2, t2, g1, t1, request).map(CollisionResult::flipped)
        }
    }

    Ok(result)
}

/// Computes the minimum distance between two posed geometries,
/// together with witness points and the separation normal.
pub fn distance(
    g1: &Geometry,
    t1: &Isometry,
    g2: &Geometry,
    t2: &Isometry,
    request: &DistanceRequest,
) -> Result<DistanceResult, QueryError> {
    validate_query(g1, t1, g2, t2)?;

    let mut result = DistanceResult::default();

    match (g1, g2) {
        (Geometry::Shape(s1), Geometry::Shape(s2)) => {
            let contact = query::shape_distance(s1, t1, s2, t2, request.enable_signed)?;
            result.update(
                contact.dist,
                Contact::NONE,
                Contact::NONE,
                contact.point1,
                contact.point2,
                Some(contact.normal),
            );
        }
        (Geometry::Bvh(m1), Geometry::Bvh(m2)) => mesh::distance_bvh_bvh(m1, t1, m2, t2, request, &mut result)?,
        (Geometry::Bvh(m1), Geometry::Shape(s2)) => mesh::distance_bvh_shape(m1, t1, s2, t2, request, &mut result)?,
        (Geometry::Shape(_), Geometry::Bvh(_)) => return distance(g2, t2, g1, t1, request).map(DistanceResult::flipped),
        (Geometry::Octree(o1), Geometry::Octree(o2)) => {
            octree::distance_octree_octree(o1, t1, o2, t2, request, &mut result)?
        }
        (Geometry::Octree(o1), Geometry::Bvh(m2)) => octree::distance_octree_bvh(o1, t1, m2, t2, request, &mut result)?,
        (Geometry::Bvh(_), Geometry::Octree(_)) => {
            return distance(g2, t2, g1, t1, request).map(DistanceResult::flipped)
        }
        (Geometry::Octree(o1), Geometry::Shape(s2)) => {
            octree::distance_octree_shape(o1, t1, s2, t2, request, &mut result)?
        }
        (Geometry::Shape(_), Geometry::Octree(_)) => {
            return distance(g2, t2, g1, t1, request).map(DistanceResult::flipped)
        }
    }

    Ok(result)
}
