//! Recursive traversal engines and the query entry points.

pub use self::object::{
    collide, compute_world_aabb, distance, CollisionObject, Geometry, SharedGeometry,
};
pub use self::types::{
    CollisionRequest, CollisionResult, Contact, ContactDetails, DistanceRequest, DistanceResult,
    NodeType, ObjectType,
};

mod mesh;
mod object;
mod octree;
mod types;
