//! The sum type over every primitive shape.

use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Point, Real, Vector};
use crate::shape::{
    Capsule, Cone, ConvexPolyhedron, Cuboid, Cylinder, HalfSpace, MassProperties, Plane, Sphere,
    SupportMap, Triangle,
};

// Stand-in extent for the unbounded directions of planes and
// half-spaces. Large enough to enclose any scene, small enough that
// squaring gaps against it stays finite.
const FAR_EXTENT: Real = 1.0e30;

/// The actual geometric data of a [`Shape`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub enum ShapeData {
    /// A sphere.
    Sphere(Sphere),
    /// A box.
    Cuboid(Cuboid),
    /// A capsule.
    Capsule(Capsule),
    /// A cone.
    Cone(Cone),
    /// A cylinder.
    Cylinder(Cylinder),
    /// A convex polytope.
    Convex(ConvexPolyhedron),
    /// A two-sided plane.
    Plane(Plane),
    /// A half-space.
    HalfSpace(HalfSpace),
    /// A single triangle.
    Triangle(Triangle),
}

/// A primitive shape together with its memoised local bounds.
///
/// The local AABB and bounding sphere are computed once at
/// construction and used as cheap conservative bounds by the
/// traversal engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct Shape {
    data: ShapeData,
    local_aabb: Aabb,
    bounding_sphere: BoundingSphere,
}

impl Shape {
    /// Wraps the given shape data, memoising its local bounds.
    pub fn new(data: ShapeData) -> Shape {
        let local_aabb = compute_local_aabb(&data);
        let bounding_sphere = compute_bounding_sphere(&data, &local_aabb);
        Shape {
            data,
            local_aabb,
            bounding_sphere,
        }
    }

    /// The geometric data of this shape.
    #[inline]
    pub fn data(&self) -> &ShapeData {
        &self.data
    }

    /// The AABB of this shape in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> &Aabb {
        &self.local_aabb
    }

    /// The bounding sphere of this shape in its local frame.
    #[inline]
    pub fn local_bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// The support mapping of this shape, if it is a bounded convex
    /// shape.
    pub fn as_support_map(&self) -> Option<&dyn SupportMap> {
        match &self.data {
            ShapeData::Sphere(s) => Some(s),
            ShapeData::Cuboid(s) => Some(s),
            ShapeData::Capsule(s) => Some(s),
            ShapeData::Cone(s) => Some(s),
            ShapeData::Cylinder(s) => Some(s),
            ShapeData::Convex(s) => Some(s),
            ShapeData::Triangle(s) => Some(s),
            ShapeData::Plane(_) | ShapeData::HalfSpace(_) => None,
        }
    }

    /// The mass properties of this shape at unit density.
    ///
    /// Unbounded and zero-volume shapes report zero mass.
    pub fn mass_properties(&self) -> MassProperties {
        match &self.data {
            ShapeData::Sphere(s) => s.mass_properties(),
            ShapeData::Cuboid(s) => s.mass_properties(),
            ShapeData::Capsule(s) => s.mass_properties(),
            ShapeData::Cone(s) => s.mass_properties(),
            ShapeData::Cylinder(s) => s.mass_properties(),
            ShapeData::Convex(s) => s.mass_properties(),
            ShapeData::Plane(_) | ShapeData::HalfSpace(_) => MassProperties::zero(),
            ShapeData::Triangle(t) => MassProperties {
                volume: 0.0,
                com: Point::from((t.a.coords + t.b.coords + t.c.coords) / 3.0),
                inertia: na::Matrix3::zeros(),
            },
        }
    }

    /// Are all numeric parameters of this shape finite?
    pub fn params_are_finite(&self) -> bool {
        match &self.data {
            ShapeData::Sphere(s) => s.radius.is_finite(),
            ShapeData::Cuboid(s) => s.half_extents.iter().all(|e| e.is_finite()),
            ShapeData::Capsule(s) => s.half_height.is_finite() && s.radius.is_finite(),
            ShapeData::Cone(s) => s.half_height.is_finite() && s.radius.is_finite(),
            ShapeData::Cylinder(s) => s.half_height.is_finite() && s.radius.is_finite(),
            ShapeData::Convex(s) => s
                .points()
                .iter()
                .all(|p| p.coords.iter().all(|e| e.is_finite())),
            ShapeData::Plane(p) => p.normal.iter().all(|e| e.is_finite()) && p.d.is_finite(),
            ShapeData::HalfSpace(h) => h.normal.iter().all(|e| e.is_finite()) && h.d.is_finite(),
            ShapeData::Triangle(t) => [t.a, t.b, t.c]
                .iter()
                .all(|p| p.coords.iter().all(|e| e.is_finite())),
        }
    }
}

impl From<ShapeData> for Shape {
    fn from(data: ShapeData) -> Shape {
        Shape::new(data)
    }
}

macro_rules! impl_from_shape(
    ($($variant: ident => $shape: ty),*) => {$(
        impl From<$shape> for Shape {
            fn from(s: $shape) -> Shape {
                Shape::new(ShapeData::$variant(s))
            }
        }
    )*}
);

impl_from_shape!(
    Sphere => Sphere,
    Cuboid => Cuboid,
    Capsule => Capsule,
    Cone => Cone,
    Cylinder => Cylinder,
    Convex => ConvexPolyhedron,
    Plane => Plane,
    HalfSpace => HalfSpace,
    Triangle => Triangle
);

fn compute_local_aabb(data: &ShapeData) -> Aabb {
    match data {
        ShapeData::Sphere(s) => centered(Vector::repeat(s.radius)),
        ShapeData::Cuboid(s) => centered(s.half_extents),
        ShapeData::Capsule(s) => centered(Vector::new(
            s.radius,
            s.radius,
            s.half_height + s.radius,
        )),
        ShapeData::Cone(s) => centered(Vector::new(s.radius, s.radius, s.half_height)),
        ShapeData::Cylinder(s) => centered(Vector::new(s.radius, s.radius, s.half_height)),
        ShapeData::Convex(s) => Aabb::from_points(s.points()),
        ShapeData::Plane(_) | ShapeData::HalfSpace(_) => centered(Vector::repeat(FAR_EXTENT)),
        ShapeData::Triangle(t) => Aabb::from_points([&t.a, &t.b, &t.c]),
    }
}

fn compute_bounding_sphere(data: &ShapeData, local_aabb: &Aabb) -> BoundingSphere {
    match data {
        ShapeData::Sphere(s) => BoundingSphere::new(Point::origin(), s.radius),
        ShapeData::Cuboid(s) => BoundingSphere::new(Point::origin(), s.half_extents.norm()),
        ShapeData::Capsule(s) => {
            BoundingSphere::new(Point::origin(), s.half_height + s.radius)
        }
        ShapeData::Cone(s) => BoundingSphere::new(
            Point::origin(),
            (s.radius * s.radius + s.half_height * s.half_height).sqrt(),
        ),
        ShapeData::Cylinder(s) => BoundingSphere::new(
            Point::origin(),
            (s.radius * s.radius + s.half_height * s.half_height).sqrt(),
        ),
        _ => local_aabb.bounding_sphere(),
    }
}

fn centered(half_extents: Vector) -> Aabb {
    Aabb::from_half_extents(Point::origin(), half_extents)
}
