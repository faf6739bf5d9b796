//! Closed-form narrow-phase solvers for the common shape pairs, and
//! the GJK/EPA fallback for everything else.
//!
//! Every function works in world coordinates and reports a
//! [`ShapeContact`] whose `dist` is the signed distance: positive for
//! separated shapes, `-depth` for penetrating ones. The normal always
//! points from the second shape toward the first.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::epa::Epa;
use crate::query::gjk::{self, CsoPoint, GjkStatus, VoronoiSimplex};
use crate::query::QueryError;
use crate::shape::{Capsule, Cuboid, HalfSpace, Plane, Sphere, SupportMap, Triangle};
use crate::utils;
use na::Unit;

/// The result of a narrow-phase query between two shapes.
#[derive(Copy, Clone, Debug)]
pub struct ShapeContact {
    /// The witness (or deepest) point on the first shape.
    pub point1: Point,
    /// The witness (or deepest) point on the second shape.
    pub point2: Point,
    /// The separation direction, pointing from the second shape
    /// toward the first.
    pub normal: UnitVector,
    /// The signed distance: positive when separated, minus the
    /// penetration depth when intersecting.
    pub dist: Real,
}

impl ShapeContact {
    /// The same contact with the roles of the two shapes swapped.
    pub fn flipped(self) -> ShapeContact {
        ShapeContact {
            point1: self.point2,
            point2: self.point1,
            normal: -self.normal,
            dist: self.dist,
        }
    }
}

/// Contact between two spheres.
pub fn contact_sphere_sphere(
    pos1: &Isometry,
    s1: &Sphere,
    pos2: &Isometry,
    s2: &Sphere,
) -> ShapeContact {
    let c1 = Point::from(pos1.translation.vector);
    let c2 = Point::from(pos2.translation.vector);

    let normal = Unit::try_new(c1 - c2, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
    let center_dist = na::distance(&c1, &c2);

    ShapeContact {
        point1: c1 - *normal * s1.radius,
        point2: c2 + *normal * s2.radius,
        normal,
        dist: center_dist - s1.radius - s2.radius,
    }
}

/// Contact between a sphere and a box.
pub fn contact_sphere_cuboid(
    pos1: &Isometry,
    sphere: &Sphere,
    pos2: &Isometry,
    cuboid: &Cuboid,
) -> ShapeContact {
    let center = Point::from(pos1.translation.vector);
    let local_center = pos2.inverse_transform_point(&center);
    let he = cuboid.half_extents;

    let clamped = Point::new(
        utils::clamp(local_center.x, -he.x, he.x),
        utils::clamp(local_center.y, -he.y, he.y),
        utils::clamp(local_center.z, -he.z, he.z),
    );

    if clamped != local_center {
        // Sphere center outside the box.
        let on_box = pos2 * clamped;
        let normal =
            Unit::try_new(center - on_box, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
        let dist = na::distance(&center, &on_box) - sphere.radius;
        ShapeContact {
            point1: center - *normal * sphere.radius,
            point2: on_box,
            normal,
            dist,
        }
    } else {
        // Deep contact: exit through the closest face.
        let mut axis = 0;
        let mut min_margin = Real::MAX;
        for i in 0..3 {
            let margin = he[i] - local_center[i].abs();
            if margin < min_margin {
                min_margin = margin;
                axis = i;
            }
        }

        let mut local_normal = Vector::zeros();
        local_normal[axis] = 1.0_f64.copysign(local_center[axis]);
        let normal = Unit::new_unchecked(pos2 * local_normal);

        let mut on_face = local_center;
        on_face[axis] = he[axis].copysign(local_center[axis]);

        ShapeContact {
            point1: center - *normal * sphere.radius,
            point2: pos2 * on_face,
            normal,
            dist: -(min_margin + sphere.radius),
        }
    }
}

/// Contact between a sphere and a capsule.
pub fn contact_sphere_capsule(
    pos1: &Isometry,
    sphere: &Sphere,
    pos2: &Isometry,
    capsule: &Capsule,
) -> ShapeContact {
    let center = Point::from(pos1.translation.vector);
    let (a, b) = capsule.segment();
    let (a, b) = (pos2 * a, pos2 * b);

    // Closest point of the capsule's inner segment to the sphere center.
    let (_, on_segment) = utils::closest_points_segment_segment(&center, &center, &a, &b);

    let normal =
        Unit::try_new(center - on_segment, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
    let dist = na::distance(&center, &on_segment) - sphere.radius - capsule.radius;

    ShapeContact {
        point1: center - *normal * sphere.radius,
        point2: on_segment + *normal * capsule.radius,
        normal,
        dist,
    }
}

/// Contact between two capsules.
pub fn contact_capsule_capsule(
    pos1: &Isometry,
    c1: &Capsule,
    pos2: &Isometry,
    c2: &Capsule,
) -> ShapeContact {
    let (a1, b1) = c1.segment();
    let (a2, b2) = c2.segment();
    let (p, q) = utils::closest_points_segment_segment(
        &(pos1 * a1),
        &(pos1 * b1),
        &(pos2 * a2),
        &(pos2 * b2),
    );

    let normal = Unit::try_new(p - q, crate::math::DEFAULT_EPSILON).unwrap_or(Vector::x_axis());
    let dist = na::distance(&p, &q) - c1.radius - c2.radius;

    ShapeContact {
        point1: p - *normal * c1.radius,
        point2: q + *normal * c2.radius,
        normal,
        dist,
    }
}

/// Contact between a sphere and a triangle given in world space.
pub fn contact_sphere_triangle(
    pos1: &Isometry,
    sphere: &Sphere,
    triangle: &Triangle,
) -> ShapeContact {
    let center = Point::from(pos1.translation.vector);
    let on_tri = triangle.project_point(&center);

    match Unit::try_new(center - on_tri, crate::math::DEFAULT_EPSILON) {
        Some(normal) => ShapeContact {
            point1: center - *normal * sphere.radius,
            point2: on_tri,
            normal,
            dist: na::distance(&center, &on_tri) - sphere.radius,
        },
        None => {
            // The center lies on the triangle: use the face normal as
            // the separation axis.
            let normal = triangle.normal().unwrap_or(Vector::x_axis());
            ShapeContact {
                point1: center - *normal * sphere.radius,
                point2: on_tri,
                normal,
                dist: -sphere.radius,
            }
        }
    }
}

/// Contact between a half-space and any support-mapped shape.
pub fn contact_halfspace_support_map(
    pos1: &Isometry,
    halfspace: &HalfSpace,
    pos2: &Isometry,
    other: &dyn SupportMap,
) -> ShapeContact {
    let normal = Unit::new_unchecked(pos1 * *halfspace.normal);
    let d = halfspace.d + normal.dot(&pos1.translation.vector);

    let deepest = other.support_point_toward(pos2, &-normal);
    let signed = normal.dot(&deepest.coords) - d;

    ShapeContact {
        point1: deepest - *normal * signed,
        point2: deepest,
        normal: -normal,
        dist: signed,
    }
}

/// Contact between a two-sided plane and any support-mapped shape.
pub fn contact_plane_support_map(
    pos1: &Isometry,
    plane: &Plane,
    pos2: &Isometry,
    other: &dyn SupportMap,
) -> ShapeContact {
    let normal = Unit::new_unchecked(pos1 * *plane.normal);
    let d = plane.d + normal.dot(&pos1.translation.vector);

    let lowest = other.support_point_toward(pos2, &-normal);
    let highest = other.support_point_toward(pos2, &normal);
    let s_min = normal.dot(&lowest.coords) - d;
    let s_max = normal.dot(&highest.coords) - d;

    if s_min > 0.0 {
        // Entirely on the positive side.
        ShapeContact {
            point1: lowest - *normal * s_min,
            point2: lowest,
            normal: -normal,
            dist: s_min,
        }
    } else if s_max < 0.0 {
        // Entirely on the negative side.
        ShapeContact {
            point1: highest - *normal * s_max,
            point2: highest,
            normal,
            dist: -s_max,
        }
    } else if s_max <= -s_min {
        // Straddling; the shallower exit is through the positive side.
        ShapeContact {
            point1: highest - *normal * s_max,
            point2: highest,
            normal,
            dist: -s_max,
        }
    } else {
        ShapeContact {
            point1: lowest - *normal * s_min,
            point2: lowest,
            normal: -normal,
            dist: s_min,
        }
    }
}

/// Penetrating contact between two boxes, by the 15-axis separating
/// axis test.
///
/// Returns `None` when the boxes do not overlap; positive distances
/// are left to the support-map path.
pub fn contact_cuboid_cuboid(
    pos1: &Isometry,
    c1: &Cuboid,
    pos2: &Isometry,
    c2: &Cuboid,
) -> Option<ShapeContact> {
    let rot1 = pos1.rotation.to_rotation_matrix().into_inner();
    let rot2 = pos2.rotation.to_rotation_matrix().into_inner();
    let center12 = pos2.translation.vector - pos1.translation.vector;

    let mut best_sep = -Real::MAX;
    let mut best_axis = Vector::x();

    let mut consider = |axis: Vector| {
        let s = center12.dot(&axis).abs();
        let ra: Real = (0..3)
            .map(|i| c1.half_extents[i] * rot1.column(i).dot(&axis).abs())
            .sum();
        let rb: Real = (0..3)
            .map(|i| c2.half_extents[i] * rot2.column(i).dot(&axis).abs())
            .sum();
        let sep = s - (ra + rb);
        if sep > best_sep {
            best_sep = sep;
            best_axis = axis;
        }
    };

    for i in 0..3 {
        consider(rot1.column(i).into_owned());
        consider(rot2.column(i).into_owned());
    }
    for i in 0..3 {
        for j in 0..3 {
            let cross = rot1.column(i).cross(&rot2.column(j));
            let len = cross.norm();
            if len > 1.0e-9 {
                consider(cross / len);
            }
        }
    }

    if best_sep > 0.0 {
        return None;
    }

    // Orient the axis from the second box toward the first.
    let normal = if center12.dot(&best_axis) > 0.0 {
        Unit::new_unchecked(-best_axis)
    } else {
        Unit::new_unchecked(best_axis)
    };

    let point1 = c1.support_point_toward(pos1, &-normal);
    let point2 = c2.support_point_toward(pos2, &normal);

    Some(ShapeContact {
        point1,
        point2,
        normal,
        dist: best_sep,
    })
}

/// Contact between two support-mapped shapes through GJK, falling
/// back to EPA on penetration.
pub fn contact_support_map_support_map(
    pos1: &Isometry,
    g1: &dyn SupportMap,
    pos2: &Isometry,
    g2: &dyn SupportMap,
) -> Result<ShapeContact, QueryError> {
    let pos12 = pos1.inv_mul(pos2);

    let init_dir = Unit::try_new(pos12.translation.vector, crate::math::DEFAULT_EPSILON)
        .map(|d| *d)
        .unwrap_or(Vector::x());
    let mut simplex = VoronoiSimplex::new(CsoPoint::from_shapes(&pos12, g1, g2, &init_dir));

    match gjk::closest_points(&pos12, g1, g2, Real::MAX, &mut simplex) {
        GjkStatus::ClosestPoints(p1, p2, dir) => {
            let dist = (p2 - p1).dot(&dir);
            Ok(ShapeContact {
                point1: pos1 * p1,
                point2: pos1 * p2,
                normal: Unit::new_unchecked(pos1 * -*dir),
                dist,
            })
        }
        GjkStatus::Intersection => {
            let mut epa = Epa::new();
            match epa.penetration(&pos12, g1, g2, &simplex) {
                Some(pen) => Ok(ShapeContact {
                    point1: pos1 * pen.p1,
                    point2: pos1 * pen.p2,
                    normal: Unit::new_unchecked(pos1 * -*pen.normal),
                    dist: -pen.depth,
                }),
                None => Err(QueryError::SolverFailure { best_bound: 0.0 }),
            }
        }
        GjkStatus::IterationLimit(best_bound) => Err(QueryError::SolverFailure { best_bound }),
        GjkStatus::NoIntersection(_) => unreachable!("no distance cap was set"),
    }
}
