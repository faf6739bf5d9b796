//! Traversal of occupancy octrees against octrees, BVH models and
//! single shapes.
//!
//! Cells are pruned by the occupancy ladder first (free, then
//! uncertain), then by an oriented-box overlap test; surviving
//! occupied leaf cells become oriented cubes fed to the narrow
//! phase. Absent children of a subdivided cell are empty regions:
//! they prune silently and never produce contacts.

use crate::bounding_volume::{convert_bv, Aabb, Bv, BvKind, Obb};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Translation};
use crate::octree::{Octree, Occupancy};
use crate::query::{self, QueryError};
use crate::shape::{Cuboid, Shape};
use crate::traversal::mesh::register_leaf_contact;
use crate::traversal::types::{
    CollisionRequest, CollisionResult, Contact, DistanceRequest, DistanceResult, NodeType,
};

// The world-space oriented box of an octree cell.
fn cell_obb(cell: &Aabb, tf: &Isometry) -> Obb {
    Obb::new(
        tf * cell.center(),
        tf.rotation.to_rotation_matrix().into_inner(),
        cell.half_extents(),
    )
}

// The cell as a box shape with its world transform.
fn cell_box(cell: &Aabb, tf: &Isometry) -> (Shape, Isometry) {
    let shape = Shape::from(Cuboid::new(cell.half_extents()));
    let pose = tf * Translation::from(cell.center().coords);
    (shape, pose)
}

/// Collision between two octrees.
pub(crate) fn collide_octree_octree(
    o1: &Octree,
    t1: &Isometry,
    o2: &Octree,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<(), QueryError> {
    let _ = collide_octree_octree_recurse(
        o1,
        0,
        &o1.root_cell(),
        t1,
        o2,
        0,
        &o2.root_cell(),
        t2,
        request,
        result,
    )?;
    Ok(())
}

fn collide_octree_octree_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    o2: &Octree,
    id2: i32,
    cell2: &Aabb,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);
    let n2 = o2.node(id2);

    if !n1.has_children() && !n2.has_children() {
        if o1.is_occupied(n1) && o2.is_occupied(n2) {
            let (box1, pose1) = cell_box(cell1, t1);
            let (box2, pose2) = cell_box(cell2, t2);
            let contact = query::shape_contact(&box1, &pose1, &box2, &pose2)?;
            register_leaf_contact(
                request,
                result,
                &contact,
                NodeType::Octree,
                NodeType::Octree,
                id1,
                id2,
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    // The occupancy ladder: free prunes, then uncertain prunes, then
    // the oriented cells must overlap.
    if o1.occupancy(n1) == Occupancy::Free || o2.occupancy(n2) == Occupancy::Free {
        return Ok(false);
    }
    if o1.occupancy(n1) == Occupancy::Uncertain || o2.occupancy(n2) == Occupancy::Uncertain {
        return Ok(false);
    }
    {
        let obb1 = cell_obb(cell1, t1);
        let obb2 = cell_obb(cell2, t2);
        let gap = obb1.distance(&obb2);
        if gap > request.security_margin + request.break_distance {
            result.update_lower_bound(gap);
            return Ok(false);
        }
    }

    // Descend the larger cell, or whichever side still has children.
    if !n2.has_children()
        || (n1.has_children() && cell1.half_extents().x > cell2.half_extents().x)
    {
        for octant in 0..8 {
            let child = n1.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell1, octant);
                if collide_octree_octree_recurse(
                    o1, child, &child_cell, t1, o2, id2, cell2, t2, request, result,
                )? {
                    return Ok(true);
                }
            }
        }
    } else {
        for octant in 0..8 {
            let child = n2.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell2, octant);
                if collide_octree_octree_recurse(
                    o1, id1, cell1, t1, o2, child, &child_cell, t2, request, result,
                )? {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}

/// Distance between two octrees.
pub(crate) fn distance_octree_octree(
    o1: &Octree,
    t1: &Isometry,
    o2: &Octree,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<(), QueryError> {
    let _ = distance_octree_octree_recurse(
        o1,
        0,
        &o1.root_cell(),
        t1,
        o2,
        0,
        &o2.root_cell(),
        t2,
        request,
        result,
    )?;
    Ok(())
}

fn distance_octree_octree_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    o2: &Octree,
    id2: i32,
    cell2: &Aabb,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);
    let n2 = o2.node(id2);

    if !n1.has_children() && !n2.has_children() {
        if o1.is_occupied(n1) && o2.is_occupied(n2) {
            let (box1, pose1) = cell_box(cell1, t1);
            let (box2, pose2) = cell_box(cell2, t2);
            let contact = query::shape_distance(&box1, &pose1, &box2, &pose2, request.enable_signed)?;
            result.update(
                contact.dist,
                id1,
                id2,
                contact.point1,
                contact.point2,
                Some(contact.normal),
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    if !o1.is_occupied(n1) || !o2.is_occupied(n2) {
        return Ok(false);
    }

    let descend_first = !n2.has_children()
        || (n1.has_children() && cell1.half_extents().x > cell2.half_extents().x);

    if descend_first {
        for octant in 0..8 {
            let child = n1.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell1, octant);
                let d = cell_obb(&child_cell, t1).distance(&cell_obb(cell2, t2));
                if d < result.min_distance - request.dont_care_slack(result.min_distance)
                    && distance_octree_octree_recurse(
                        o1, child, &child_cell, t1, o2, id2, cell2, t2, request, result,
                    )?
                {
                    return Ok(true);
                }
            }
        }
    } else {
        for octant in 0..8 {
            let child = n2.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell2, octant);
                let d = cell_obb(cell1, t1).distance(&cell_obb(&child_cell, t2));
                if d < result.min_distance - request.dont_care_slack(result.min_distance)
                    && distance_octree_octree_recurse(
                        o1, id1, cell1, t1, o2, child, &child_cell, t2, request, result,
                    )?
                {
                    return Ok(true);
                }
            }
        }
    }

    Ok(false)
}

/// Collision between an octree and a BVH model; the octree plays the
/// first role.
pub(crate) fn collide_octree_bvh(
    o1: &Octree,
    t1: &Isometry,
    m2: &BvhModel,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<(), QueryError> {
    let _ = collide_octree_bvh_recurse(o1, 0, &o1.root_cell(), t1, m2, 0, t2, request, result)?;
    Ok(())
}

fn collide_octree_bvh_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    m2: &BvhModel,
    id2: i32,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);
    let n2 = m2.node(id2);

    if !n1.has_children() && n2.is_leaf() {
        if o1.is_occupied(n1) {
            let (box1, pose1) = cell_box(cell1, t1);
            let [a, b, c] = m2.triangle_points(n2.primitive);
            let contact = query::shape_triangle_interaction(&box1, &pose1, &a, &b, &c, t2)?;
            register_leaf_contact(
                request,
                result,
                &contact,
                NodeType::Octree,
                NodeType::of_bv_kind(m2.kind()),
                id1,
                n2.primitive as i32,
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    if !o1.is_occupied(n1) {
        return Ok(false);
    }

    {
        let cell_bv = convert_bv(&Bv::Aabb(*cell1), t1, BvKind::Obb);
        let node_bv = convert_bv(&n2.bv, t2, BvKind::Obb);
        let gap = cell_bv.distance(&node_bv);
        if gap > request.security_margin + request.break_distance {
            result.update_lower_bound(gap);
            return Ok(false);
        }
    }

    if n2.is_leaf()
        || (n1.has_children() && cell1.size() > m2.node(id2).bv.size())
    {
        for octant in 0..8 {
            let child = n1.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell1, octant);
                if collide_octree_bvh_recurse(
                    o1, child, &child_cell, t1, m2, id2, t2, request, result,
                )? {
                    return Ok(true);
                }
            }
        }
    } else {
        if collide_octree_bvh_recurse(o1, id1, cell1, t1, m2, n2.left, t2, request, result)? {
            return Ok(true);
        }
        if collide_octree_bvh_recurse(o1, id1, cell1, t1, m2, n2.right, t2, request, result)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Distance between an octree and a BVH model; the octree plays the
/// first role.
pub(crate) fn distance_octree_bvh(
    o1: &Octree,
    t1: &Isometry,
    m2: &BvhModel,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<(), QueryError> {
    let _ = distance_octree_bvh_recurse(o1, 0, &o1.root_cell(), t1, m2, 0, t2, request, result)?;
    Ok(())
}

fn distance_octree_bvh_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    m2: &BvhModel,
    id2: i32,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);
    let n2 = m2.node(id2);

    if !n1.has_children() && n2.is_leaf() {
        if o1.is_occupied(n1) {
            let (box1, pose1) = cell_box(cell1, t1);
            let [a, b, c] = m2.triangle_points(n2.primitive);
            let contact = query::shape_triangle_interaction(&box1, &pose1, &a, &b, &c, t2)?;
            let dist = if request.enable_signed {
                contact.dist
            } else {
                contact.dist.max(0.0)
            };
            result.update(
                dist,
                id1,
                n2.primitive as i32,
                contact.point1,
                contact.point2,
                Some(contact.normal),
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    if !o1.is_occupied(n1) {
        return Ok(false);
    }

    if n2.is_leaf() || (n1.has_children() && cell1.size() > m2.node(id2).bv.size()) {
        for octant in 0..8 {
            let child = n1.children[octant];
            if child >= 0 {
                let child_cell = Octree::child_cell(cell1, octant);
                let d = Bv::Aabb(child_cell.transform_by(t1))
                    .distance(&Bv::Aabb(n2.bv.aabb().transform_by(t2)));
                if d < result.min_distance - request.dont_care_slack(result.min_distance)
                    && distance_octree_bvh_recurse(
                        o1, child, &child_cell, t1, m2, id2, t2, request, result,
                    )?
                {
                    return Ok(true);
                }
            }
        }
    } else {
        let cell_aabb = cell1.transform_by(t1);
        let mut scored = [n2.left, n2.right].map(|child| {
            let child_aabb = m2.node(child).bv.aabb().transform_by(t2);
            (cell_aabb.distance(&child_aabb), child)
        });
        if scored[1].0 < scored[0].0 {
            scored.swap(0, 1);
        }

        for (bound, child) in scored {
            if bound < result.min_distance - request.dont_care_slack(result.min_distance)
                && distance_octree_bvh_recurse(
                    o1, id1, cell1, t1, m2, child, t2, request, result,
                )?
            {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Collision between an octree and a single shape; the octree plays
/// the first role.
pub(crate) fn collide_octree_shape(
    o1: &Octree,
    t1: &Isometry,
    shape: &Shape,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<(), QueryError> {
    let shape_obb = convert_bv(&Bv::Aabb(*shape.local_aabb()), t2, BvKind::Obb);
    let _ = collide_octree_shape_recurse(
        o1,
        0,
        &o1.root_cell(),
        t1,
        shape,
        &shape_obb,
        t2,
        request,
        result,
    )?;
    Ok(())
}

fn collide_octree_shape_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    shape: &Shape,
    shape_obb: &Bv,
    t2: &Isometry,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);

    if !n1.has_children() {
        if o1.is_occupied(n1) {
            let cell_bv = convert_bv(&Bv::Aabb(*cell1), t1, BvKind::Obb);
            let gap = cell_bv.distance(shape_obb);
            if gap > request.security_margin + request.break_distance {
                result.update_lower_bound(gap);
                return Ok(false);
            }

            let (box1, pose1) = cell_box(cell1, t1);
            let contact = query::shape_contact(&box1, &pose1, shape, t2)?;
            register_leaf_contact(
                request,
                result,
                &contact,
                NodeType::Octree,
                NodeType::of_shape(shape),
                id1,
                Contact::NONE,
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    if !o1.is_occupied(n1) {
        return Ok(false);
    }

    {
        let cell_bv = convert_bv(&Bv::Aabb(*cell1), t1, BvKind::Obb);
        let gap = cell_bv.distance(shape_obb);
        if gap > request.security_margin + request.break_distance {
            result.update_lower_bound(gap);
            return Ok(false);
        }
    }

    for octant in 0..8 {
        let child = n1.children[octant];
        if child >= 0 {
            let child_cell = Octree::child_cell(cell1, octant);
            if collide_octree_shape_recurse(
                o1, child, &child_cell, t1, shape, shape_obb, t2, request, result,
            )? {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Distance between an octree and a single shape; the octree plays
/// the first role.
pub(crate) fn distance_octree_shape(
    o1: &Octree,
    t1: &Isometry,
    shape: &Shape,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<(), QueryError> {
    let shape_aabb = shape.local_aabb().transform_by(t2);
    let _ = distance_octree_shape_recurse(
        o1,
        0,
        &o1.root_cell(),
        t1,
        shape,
        &shape_aabb,
        t2,
        request,
        result,
    )?;
    Ok(())
}

fn distance_octree_shape_recurse(
    o1: &Octree,
    id1: i32,
    cell1: &Aabb,
    t1: &Isometry,
    shape: &Shape,
    shape_aabb: &Aabb,
    t2: &Isometry,
    request: &DistanceRequest,
    result: &mut DistanceResult,
) -> Result<bool, QueryError> {
    let n1 = o1.node(id1);

    if !n1.has_children() {
        if o1.is_occupied(n1) {
            let (box1, pose1) = cell_box(cell1, t1);
            let contact = query::shape_distance(&box1, &pose1, shape, t2, request.enable_signed)?;
            result.update(
                contact.dist,
                id1,
                Contact::NONE,
                contact.point1,
                contact.point2,
                Some(contact.normal),
            );
            return Ok(request.is_satisfied(result));
        }
        return Ok(false);
    }

    if !o1.is_occupied(n1) {
        return Ok(false);
    }

    for octant in 0..8 {
        let child = n1.children[octant];
        if child >= 0 {
            let child_cell = Octree::child_cell(cell1, octant);
            let d = child_cell.transform_by(t1).distance(shape_aabb);
            if d < result.min_distance - request.dont_care_slack(result.min_distance)
                && distance_octree_shape_recurse(
                    o1, child, &child_cell, t1, shape, shape_aabb, t2, request, result,
                )?
            {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
