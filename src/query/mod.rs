//! Non-persistent geometric queries between pairs of shapes.

pub use self::contact::{
    contact_capsule_capsule, contact_cuboid_cuboid, contact_halfspace_support_map,
    contact_plane_support_map, contact_sphere_capsule, contact_sphere_cuboid,
    contact_sphere_sphere, contact_sphere_triangle, contact_support_map_support_map, ShapeContact,
};
pub use self::epa::{Epa, Penetration};
pub use self::error::QueryError;
pub use self::gjk::{CsoPoint, GjkStatus, VoronoiSimplex};
pub use self::solver::{shape_contact, shape_distance, shape_intersect, shape_triangle_interaction, ContactPoint};

mod contact;
mod epa;
mod error;
pub mod gjk;
mod solver;
