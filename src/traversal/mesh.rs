//! Traversal of BVH trees against BVH trees and single shapes.

use crate::bounding_volume::{convert_bv, Bv};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Real};
use crate::query::{self, QueryError, ShapeContact};
use crate::shape::Shape;
use crate::traversal::types::{
    CollisionRequest, CollisionResult, Contact, ContactDetails, DistanceRequest, DistanceResult,
    NodeType,
};
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 64;

// Records a leaf-pair outcome on a collision result: a contact when
// the pair comes within the security margin, a lower-bound refinement
// otherwise.
pub(crate) fn register_leaf_contact(
    request: &CollisionRequest,
    result: &mut CollisionResult,
    contact: &ShapeContact,
    o1: NodeType,
    o2: NodeType,
    b1: i32,
    b2: i32,
) {
    if contact.dist <= request.security_margin {
        let details = request.enable_contact.then(|| ContactDetails {
            pos: contact.point1,
            normal: contact.normal,
            depth: (-contact.dist).max(0.0),
        });
        result.add_contact(
            request,
            Contact {
                o1,
                o2,
                b1,
                b2,
                details,
            },
        );
        result.update_lower_bound(contact.dist.max(0.0));
    } else {
        result.update_lower_bound(contact.dist);
    }
}

fn triangle_pair_contact(
    m1: &BvhModel,
    prim1: u32,
    t1: &Isometry,
    m2: &BvhModel,
    prim2: u32,
    t2: &Isometry,
) -> Result<ShapeContact, QueryError> {
    let [a, b, c] = m1.triangle_points(prim1);
    let tri1 = Shape::from(crate::shape::Triangle::new(a, b, c));
    let [d, e, f] = m2.triangle_points(prim2);
    query::shape_triangle_interaction(&tri1, t1, &d, &e, &f, t2)
}

// Does the collision descend rule pick the first tree? Per the
// traversal contract: descend the larger bounding volume, ties to the
// first tree, leaves never descend.
fn descend_first(n1_leaf: bool, n2_leaf: bool, size1: Real, size2: Real) -> bool {
    !n1_leaf && (n2_leaf || size1 >= size2)
}

/// Collision between two BVH models.
pub(crate) fn collide_bvh_bvh(
    m1: &BvhModel,
    t1: &Isometry,
    m2: &BvhModel,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<(), QueryError> {
    let o1 = NodeType::of_bv_kind(m1.kind());
    let o2 = NodeType::of_bv_kind(m2.kind());

    let mut stack: SmallVec<[(i32, i32); TRAVERSAL_STACK_SIZE]> = SmallVec::new();
    stack.push((0, 0));

    while let Some((a, b)) = stack.pop() {
        if request.is_satisfied(result) {
            return Ok(());
        }

        let n1 = m1.node(a);
        let n2 = m2.node(b);
        let bv1 = n1.bv.transform_by(t1);
        let bv2 = n2.bv.transform_by(t2);

        let gap = bv1.distance(&bv2);
        if gap > request.security_margin + request.break_distance {
            result.update_lower_bound(gap);
            continue;
        }

        match (n1.is_leaf(), n2.is_leaf()) {
            (true, true) => {
                let contact =
                    triangle_pair_contact(m1, n1.primitive, t1, m2, n2.primitive, t2)?;
                register_leaf_contact(
                    request,
                    result,
                    &contact,
                    o1,
                    o2,
                    n1.primitive as i32,
                    n2.primitive as i32,
                );
            }
            (n1_leaf, n2_leaf) => {
                if descend_first(n1_leaf, n2_leaf, bv1.size(), bv2.size()) {
                    stack.push((n1.left, b));
                    stack.push((n1.right, b));
                } else {
                    stack.push((a, n2.left));
                    stack.push((a, n2.right));
                }
            }
        }
    }

    Ok(())
}

/// Collision between a BVH model and a single shape; the BVH plays
/// the first role.
pub(crate) fn collide_bvh_shape(
    m1: &BvhModel,
    t1: &Isometry,
    shape: &Shape,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<(), QueryError> {
    let o1 = NodeType::of_bv_kind(m1.kind());
    let o2 = NodeType::of_shape(shape);
    let shape_bv = convert_bv(&Bv::Aabb(*shape.local_aabb()), t2, m1.kind());

    let mut stack: SmallVec<[i32; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
    stack.push(0);

    while let Some(a) = stack.pop() {
        if request.is_satisfied(result) {
            return Ok(());
        }

        let n1 = m1.node(a);
        let bv1 = n1.bv.transform_by(t1);

        let gap = bv1.distance(&shape_bv);
        if gap > request.security_margin + request.break_distance {
            result.update_lower_bound(gap);
            continue;
        }

        if n1.is_leaf() {
            let [a0, a1, a2] = m1.triangle_points(n1.primitive);
            let contact =
                query::shape_triangle_interaction(shape, t2, &a0, &a1, &a2, t1)?.flipped();
            register_leaf_contact(
                request,
                result,
                &contact,
                o1,
                o2,
                n1.primitive as i32,
                Contact::NONE,
            );
        } else {
            stack.push(n1.left);
            stack.push(n1.right);
        }
    }

    Ok(())
}

/// Distance between two BVH models, by ordered best-first descent.
pub(crate) fn distance_bvh_bvh(
    m1: &BvhModel,
    t1: &Isometry,
    m2: &BvhModel,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<(), QueryError> {
    let _ = distance_bvh_bvh_recurse(m1, t1, m2, t2, 0, 0, request, result)?;
    Ok(())
}

fn distance_bvh_bvh_recurse(
    m1: &BvhModel,
    t1: &Isometry,
    m2: &BvhModel,
    t2: &Isometry,
    a: i32,
    b: i32,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<bool, QueryError> {
    let n1 = m1.node(a);
    let n2 = m2.node(b);

    if n1.is_leaf() && n2.is_leaf() {
        let contact = triangle_pair_contact(m1, n1.primitive, t1, m2, n2.primitive, t2)?;
        let dist = if request.enable_signed {
            contact.dist
        } else {
            contact.dist.max(0.0)
        };
        result.update(
            dist,
            n1.primitive as i32,
            n2.primitive as i32,
            contact.point1,
            contact.point2,
            Some(contact.normal),
        );
        return Ok(request.is_satisfied(result));
    }

    let bv1 = n1.bv.transform_by(t1);
    let bv2 = n2.bv.transform_by(t2);

    // Expand one side; the candidate child pairs are visited closest
    // lower bound first.
    let candidates: [(i32, i32); 2] =
        if descend_first(n1.is_leaf(), n2.is_leaf(), bv1.size(), bv2.size()) {
            [(n1.left, b), (n1.right, b)]
        } else {
            [(a, n2.left), (a, n2.right)]
        };

    let mut scored = candidates.map(|(ca, cb)| {
        let cbv1 = m1.node(ca).bv.transform_by(t1);
        let cbv2 = m2.node(cb).bv.transform_by(t2);
        (cbv1.distance(&cbv2), ca, cb)
    });
    if scored[1].0 < scored[0].0 {
        scored.swap(0, 1);
    }

    for (bound, ca, cb) in scored {
        if bound < result.min_distance - request.dont_care_slack(result.min_distance) {
            if distance_bvh_bvh_recurse(m1, t1, m2, t2, ca, cb, request, result)? {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Distance between a BVH model and a single shape; the BVH plays the
/// first role.
pub(crate) fn distance_bvh_shape(
    m1: &BvhModel,
    t1: &Isometry,
    shape: &Shape,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<(), QueryError> {
    let shape_bv = convert_bv(&Bv::Aabb(*shape.local_aabb()), t2, m1.kind());
    let _ = distance_bvh_shape_recurse(m1, t1, shape, &shape_bv, t2, 0, request, result)?;
    Ok(())
}

fn distance_bvh_shape_recurse(
    m1: &BvhModel,
    t1: &Isometry,
    shape: &Shape,
    shape_bv: &Bv,
    t2: &Isometry,
    a: i32,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<bool, QueryError> {
    let n1 = m1.node(a);

    if n1.is_leaf() {
        let [a0, a1, a2] = m1.triangle_points(n1.primitive);
        let contact = query::shape_triangle_interaction(shape, t2, &a0, &a1, &a2, t1)?.flipped();
        let dist = if request.enable_signed {
            contact.dist
        } else {
            contact.dist.max(0.0)
        };
        result.update(
            dist,
            n1.primitive as i32,
            Contact::NONE,
            contact.point1,
            contact.point2,
            Some(contact.normal),
        );
        return Ok(request.is_satisfied(result));
    }

    let mut scored = [n1.left, n1.right].map(|child| {
        let cbv = m1.node(child).bv.transform_by(t1);
        (cbv.distance(shape_bv), child)
    });
    if scored[1].0 < scored[0].0 {
        scored.swap(0, 1);
    }

    for (bound, child) in scored {
        if bound < result.min_distance - request.dont_care_slack(result.min_distance) {
            if distance_bvh_shape_recurse(m1, t1, shape, shape_bv, t2, child, request, result)? {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
