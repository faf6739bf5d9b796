//! Primitive shapes, their support mappings and mass properties.

pub use self::capsule::Capsule;
pub use self::cone::Cone;
pub use self::convex::{ConvexPolyhedron, Faces};
pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::half_space::{HalfSpace, Plane};
pub use self::mass_properties::MassProperties;
pub use self::shape::{Shape, ShapeData};
pub use self::sphere::Sphere;
pub use self::support_map::SupportMap;
pub use self::triangle::Triangle;

mod capsule;
mod cone;
mod convex;
mod cuboid;
mod cylinder;
mod half_space;
mod mass_properties;
mod shape;
mod sphere;
mod support_map;
mod triangle;
