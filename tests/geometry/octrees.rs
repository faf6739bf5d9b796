use approx::assert_relative_eq;
use prox3d::bounding_volume::BvKind;
use prox3d::bvh::{unit_quad_mesh, BvhModel};
use prox3d::math::{Isometry, Point};
use prox3d::octree::Octree;
use prox3d::shape::{Shape, Sphere};
use prox3d::traversal::{
    collide, distance, CollisionRequest, DistanceRequest, Geometry, NodeType,
};

// A unit-cube octree subdivided one level, with every octant occupied.
fn full_unit_octree() -> Octree {
    let mut tree = Octree::new(Point::origin(), 0.5);
    for sx in [-0.25, 0.25] {
        for sy in [-0.25, 0.25] {
            for sz in [-0.25, 0.25] {
                tree.update_cell(&Point::new(sx, sy, sz), 1, 2.0);
            }
        }
    }
    tree
}

#[test]
fn overlapping_voxel_octrees_collide() {
    let g1 = Geometry::Octree(full_unit_octree());
    let g2 = Geometry::Octree(full_unit_octree());

    let res = collide(
        &g1,
        &Isometry::identity(),
        &g2,
        &Isometry::translation(0.5, 0.0, 0.0),
        &CollisionRequest {
            max_contacts: 64,
            ..Default::default()
        },
    )
    .unwrap();

    assert!(res.is_collision());
    let contact = res.contacts[0];
    assert_eq!(contact.o1, NodeType::Octree);
    assert_eq!(contact.o2, NodeType::Octree);
    assert!(contact.b1 >= 0 && contact.b2 >= 0);
}

#[test]
fn free_cells_never_collide() {
    // Same cells, but pushed below the free threshold.
    let mut free = Octree::new(Point::origin(), 0.5);
    free.update_cell(&Point::new(0.25, 0.25, 0.25), 1, -2.0);

    let res = collide(
        &Geometry::Octree(free),
        &Isometry::identity(),
        &Geometry::Octree(full_unit_octree()),
        &Isometry::identity(),
        &CollisionRequest::default(),
    )
    .unwrap();

    assert!(!res.is_collision());
}

#[test]
fn uncertain_cells_prune() {
    let mut tree = full_unit_octree();
    tree.set_occupancy_thresholds(5.0, -5.0);

    // Everything is now uncertain: coincident trees stay contact-free.
    let res = collide(
        &Geometry::Octree(tree),
        &Isometry::identity(),
        &Geometry::Octree(full_unit_octree()),
        &Isometry::identity(),
        &CollisionRequest::default(),
    )
    .unwrap();

    assert!(!res.is_collision());
}

#[test]
fn octree_distance_to_octree() {
    let g1 = Geometry::Octree(full_unit_octree());
    let g2 = Geometry::Octree(full_unit_octree());

    let res = distance(
        &g1,
        &Isometry::identity(),
        &g2,
        &Isometry::translation(3.0, 0.0, 0.0),
        &DistanceRequest::default(),
    )
    .unwrap();

    // Unit cubes centered 3 apart leave a 2.0 gap.
    assert_relative_eq!(res.min_distance, 2.0, epsilon = 1.0e-6);
    assert!(res.ids[0] >= 0 && res.ids[1] >= 0);
}

#[test]
fn octree_against_shape_and_mesh() {
    let tree = Geometry::Octree(full_unit_octree());
    let ball = Geometry::Shape(Shape::from(Sphere::new(0.5)));

    let res = distance(
        &tree,
        &Isometry::identity(),
        &ball,
        &Isometry::translation(3.0, 0.0, 0.0),
        &DistanceRequest::default(),
    )
    .unwrap();
    assert_relative_eq!(res.min_distance, 2.0, epsilon = 1.0e-6);

    // Swapped order gives the mirrored witnesses.
    let swapped = distance(
        &ball,
        &Isometry::translation(3.0, 0.0, 0.0),
        &tree,
        &Isometry::identity(),
        &DistanceRequest::default(),
    )
    .unwrap();
    assert_relative_eq!(swapped.min_distance, 2.0, epsilon = 1.0e-6);
    assert_relative_eq!(
        swapped.nearest_points[0],
        res.nearest_points[1],
        epsilon = 1.0e-6
    );

    let (vertices, triangles) = unit_quad_mesh();
    let mesh = Geometry::Bvh(BvhModel::new(vertices, triangles, BvKind::Obb).unwrap());

    let col = collide(
        &tree,
        &Isometry::identity(),
        &mesh,
        &Isometry::identity(),
        &CollisionRequest::default(),
    )
    .unwrap();
    assert!(col.is_collision());

    let far = distance(
        &tree,
        &Isometry::identity(),
        &mesh,
        &Isometry::translation(0.0, 0.0, 4.0),
        &DistanceRequest::default(),
    )
    .unwrap();
    assert_relative_eq!(far.min_distance, 3.5, epsilon = 1.0e-6);
}
