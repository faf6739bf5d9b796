//! Narrow-phase dispatch over pairs of primitive shapes.

use crate::math::{Isometry, Point, Real, UnitVector};
use crate::query::contact::{self, ShapeContact};
use crate::query::QueryError;
use crate::shape::{Shape, ShapeData};
use crate::traversal::NodeType;

/// A single point of penetrating contact.
#[derive(Copy, Clone, Debug)]
pub struct ContactPoint {
    /// The contact position, on the surface of the first shape.
    pub point: Point,
    /// The contact normal, pointing from the second shape toward the
    /// first.
    pub normal: UnitVector,
    /// The penetration depth.
    pub depth: Real,
}

/// Computes the signed-distance contact between two posed shapes.
///
/// This is the single dispatch point of the narrow phase: pairs with
/// a closed form use it, everything else runs GJK with the EPA
/// penetration fallback.
pub fn shape_contact(
    s1: &Shape,
    pos1: &Isometry,
    s2: &Shape,
    pos2: &Isometry,
) -> Result<ShapeContact, QueryError> {
    use ShapeData::*;

    match (s1.data(), s2.data()) {
        (Sphere(a), Sphere(b)) => Ok(contact::contact_sphere_sphere(pos1, a, pos2, b)),
        (Sphere(a), Cuboid(b)) => Ok(contact::contact_sphere_cuboid(pos1, a, pos2, b)),
        (Cuboid(a), Sphere(b)) => {
            Ok(contact::contact_sphere_cuboid(pos2, b, pos1, a).flipped())
        }
        (Sphere(a), Capsule(b)) => Ok(contact::contact_sphere_capsule(pos1, a, pos2, b)),
        (Capsule(a), Sphere(b)) => {
            Ok(contact::contact_sphere_capsule(pos2, b, pos1, a).flipped())
        }
        (Capsule(a), Capsule(b)) => Ok(contact::contact_capsule_capsule(pos1, a, pos2, b)),
        (Sphere(a), Triangle(b)) => {
            let tri = transform_triangle(b, pos2);
            Ok(contact::contact_sphere_triangle(pos1, a, &tri))
        }
        (Triangle(a), Sphere(b)) => {
            let tri = transform_triangle(a, pos1);
            Ok(contact::contact_sphere_triangle(pos2, b, &tri).flipped())
        }

        // Planes and half-spaces only pair with bounded shapes.
        (Plane(_) | HalfSpace(_), Plane(_) | HalfSpace(_)) => Err(QueryError::UnsupportedPair {
            first: NodeType::of_shape(s1),
            second: NodeType::of_shape(s2),
        }),
        (HalfSpace(a), _) => {
            let support = s2.as_support_map().expect("bounded shape");
            Ok(contact::contact_halfspace_support_map(pos1, a, pos2, support))
        }
        (_, HalfSpace(b)) => {
            let support = s1.as_support_map().expect("bounded shape");
            Ok(contact::contact_halfspace_support_map(pos2, b, pos1, support).flipped())
        }
        (Plane(a), _) => {
            let support = s2.as_support_map().expect("bounded shape");
            Ok(contact::contact_plane_support_map(pos1, a, pos2, support))
        }
        (_, Plane(b)) => {
            let support = s1.as_support_map().expect("bounded shape");
            Ok(contact::contact_plane_support_map(pos2, b, pos1, support).flipped())
        }

        (Cuboid(a), Cuboid(b)) => {
            if let Some(c) = contact::contact_cuboid_cuboid(pos1, a, pos2, b) {
                Ok(c)
            } else {
                // Separated boxes: the support-map path computes the
                // distance and its witnesses.
                support_map_contact(s1, pos1, s2, pos2)
            }
        }

        _ => support_map_contact(s1, pos1, s2, pos2),
    }
}

fn transform_triangle(t: &crate::shape::Triangle, pos: &Isometry) -> crate::shape::Triangle {
    crate::shape::Triangle::new(pos * t.a, pos * t.b, pos * t.c)
}

fn support_map_contact(
    s1: &Shape,
    pos1: &Isometry,
    s2: &Shape,
    pos2: &Isometry,
) -> Result<ShapeContact, QueryError> {
    let (Some(g1), Some(g2)) = (s1.as_support_map(), s2.as_support_map()) else {
        return Err(QueryError::UnsupportedPair {
            first: NodeType::of_shape(s1),
            second: NodeType::of_shape(s2),
        });
    };

    contact::contact_support_map_support_map(pos1, g1, pos2, g2)
}

/// Decides intersection between two posed shapes.
///
/// Returns the contact point, normal (from the second shape toward
/// the first) and depth if they intersect.
pub fn shape_intersect(
    s1: &Shape,
    pos1: &Isometry,
    s2: &Shape,
    pos2: &Isometry,
) -> Result<Option<ContactPoint>, QueryError> {
    let contact = shape_contact(s1, pos1, s2, pos2)?;

    if contact.dist <= 0.0 {
        Ok(Some(ContactPoint {
            point: contact.point1,
            normal: contact.normal,
            depth: -contact.dist,
        }))
    } else {
        Ok(None)
    }
}

/// Computes the distance between two posed shapes together with the
/// witness points and separation normal.
///
/// When the shapes penetrate and `enable_signed` is set, the returned
/// `dist` is minus the penetration depth; otherwise it is clamped at
/// zero.
pub fn shape_distance(
    s1: &Shape,
    pos1: &Isometry,
    s2: &Shape,
    pos2: &Isometry,
    enable_signed: bool,
) -> Result<ShapeContact, QueryError> {
    let mut contact = shape_contact(s1, pos1, s2, pos2)?;
    if !enable_signed && contact.dist < 0.0 {
        contact.dist = 0.0;
    }
    Ok(contact)
}

/// Interaction between a shape and a triangle given by its vertices
/// in the frame of `pos_tri`.
pub fn shape_triangle_interaction(
    s1: &Shape,
    pos1: &Isometry,
    v0: &Point,
    v1: &Point,
    v2: &Point,
    pos_tri: &Isometry,
) -> Result<ShapeContact, QueryError> {
    let tri = Shape::from(crate::shape::Triangle::new(*v0, *v1, *v2));
    shape_contact(s1, pos1, &tri, pos_tri)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vector;
    use crate::shape::{Cuboid, Plane, Sphere};

    #[test]
    fn intersect_and_distance_agree() {
        let s1 = Shape::from(Sphere::new(1.0));
        let s2 = Shape::from(Sphere::new(1.0));
        let pos1 = Isometry::identity();

        // Separated: no intersection, positive distance.
        let far = Isometry::translation(3.0, 0.0, 0.0);
        assert!(shape_intersect(&s1, &pos1, &s2, &far).unwrap().is_none());
        let d = shape_distance(&s1, &pos1, &s2, &far, false).unwrap();
        assert_relative_eq!(d.dist, 1.0, epsilon = 1.0e-6);

        // Penetrating: intersection with depth, signed distance.
        let near = Isometry::translation(1.5, 0.0, 0.0);
        let hit = shape_intersect(&s1, &pos1, &s2, &near).unwrap().unwrap();
        assert_relative_eq!(hit.depth, 0.5, epsilon = 1.0e-6);
        // The reported position sits on the surface of the first shape.
        assert_relative_eq!(hit.point, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
        let d = shape_distance(&s1, &pos1, &s2, &near, true).unwrap();
        assert_relative_eq!(d.dist, -0.5, epsilon = 1.0e-6);
        assert_relative_eq!(hit.point, d.point1, epsilon = 1.0e-6);
    }

    #[test]
    fn plane_plane_is_unsupported() {
        let p = Shape::from(Plane::new(Vector::z_axis(), 0.0));
        let err = shape_contact(&p, &Isometry::identity(), &p, &Isometry::identity());
        assert!(matches!(err, Err(QueryError::UnsupportedPair { .. })));
    }

    #[test]
    fn sphere_triangle_scenario() {
        let sphere = Shape::from(Sphere::new(0.5));
        let pos = Isometry::translation(0.0, 0.0, 0.4);
        let contact = shape_triangle_interaction(
            &sphere,
            &pos,
            &Point::new(-1.0, -1.0, 0.0),
            &Point::new(1.0, -1.0, 0.0),
            &Point::new(0.0, 1.0, 0.0),
            &Isometry::identity(),
        )
        .unwrap();

        assert_relative_eq!(contact.dist, -0.1, epsilon = 1.0e-9);
        assert_relative_eq!(contact.point2, Point::new(0.0, 0.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(*contact.normal, Vector::z(), epsilon = 1.0e-9);
    }

    #[test]
    fn cone_cylinder_through_gjk() {
        let cone = Shape::from(crate::shape::Cone::new(1.0, 1.0));
        let cyl = Shape::from(crate::shape::Cylinder::new(1.0, 1.0));
        let d = shape_distance(
            &cone,
            &Isometry::identity(),
            &cyl,
            &Isometry::translation(5.0, 0.0, 0.0),
            false,
        )
        .unwrap();
        assert_relative_eq!(d.dist, 3.0, epsilon = 1.0e-5);
    }

    #[test]
    fn separated_cuboids_get_a_distance() {
        let c = Shape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let d = shape_distance(
            &c,
            &Isometry::identity(),
            &c,
            &Isometry::translation(4.0, 0.0, 0.0),
            false,
        )
        .unwrap();
        assert_relative_eq!(d.dist, 2.0, epsilon = 1.0e-6);
    }
}
