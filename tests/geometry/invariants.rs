use approx::assert_relative_eq;
use prox3d::bounding_volume::BvKind;
use prox3d::bvh::BvhModel;
use prox3d::math::{Isometry, Point, Real, Vector};
use prox3d::query::{shape_distance, shape_intersect};
use prox3d::shape::{Capsule, Cuboid, Shape, Sphere};
use prox3d::traversal::{collide, distance, CollisionRequest, DistanceRequest, Geometry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_isometry(rng: &mut StdRng, spread: Real) -> Isometry {
    let translation = Vector::new(
        rng.gen_range(-spread..spread),
        rng.gen_range(-spread..spread),
        rng.gen_range(-spread..spread),
    );
    let axis_angle = Vector::new(
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
        rng.gen_range(-3.0..3.0),
    );
    Isometry::new(translation, axis_angle)
}

fn random_shape(rng: &mut StdRng) -> Geometry {
    match rng.gen_range(0..3) {
        0 => Geometry::Shape(Shape::from(Sphere::new(rng.gen_range(0.2..1.5)))),
        1 => Geometry::Shape(Shape::from(Cuboid::new(Vector::new(
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
        )))),
        _ => Geometry::Shape(Shape::from(Capsule::new(
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.1..0.8),
        ))),
    }
}

#[test]
fn collide_and_distance_are_symmetric() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let g1 = random_shape(&mut rng);
        let g2 = random_shape(&mut rng);
        let t1 = random_isometry(&mut rng, 2.0);
        let t2 = random_isometry(&mut rng, 2.0);

        let req = CollisionRequest {
            enable_contact: true,
            ..Default::default()
        };
        let ab = collide(&g1, &t1, &g2, &t2, &req).unwrap();
        let ba = collide(&g2, &t2, &g1, &t1, &req).unwrap();
        assert_eq!(ab.is_collision(), ba.is_collision());

        if let (Some(ca), Some(cb)) = (ab.contacts.first(), ba.contacts.first()) {
            assert_eq!(ca.o1, cb.o2);
            assert_eq!(ca.o2, cb.o1);
            let (da, db) = (ca.details.unwrap(), cb.details.unwrap());
            assert_relative_eq!(da.depth, db.depth, epsilon = 1.0e-5);
            assert_relative_eq!(*da.normal, -*db.normal, epsilon = 1.0e-3);
        }

        let dab = distance(&g1, &t1, &g2, &t2, &DistanceRequest::default()).unwrap();
        let dba = distance(&g2, &t2, &g1, &t1, &DistanceRequest::default()).unwrap();
        assert_relative_eq!(dab.min_distance, dba.min_distance, epsilon = 1.0e-5);
        assert_relative_eq!(
            dab.nearest_points[0],
            dba.nearest_points[1],
            epsilon = 1.0e-4
        );
    }
}

#[test]
fn rigid_motion_covariance() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..30 {
        let g1 = random_shape(&mut rng);
        let g2 = random_shape(&mut rng);
        let t1 = random_isometry(&mut rng, 2.0);
        let t2 = random_isometry(&mut rng, 2.0);
        let motion = random_isometry(&mut rng, 5.0);

        let before = distance(&g1, &t1, &g2, &t2, &DistanceRequest::default()).unwrap();
        let after = distance(
            &g1,
            &(motion * t1),
            &g2,
            &(motion * t2),
            &DistanceRequest::default(),
        )
        .unwrap();

        assert_relative_eq!(before.min_distance, after.min_distance, epsilon = 1.0e-5);

        if before.min_distance > 1.0e-3 {
            // Witness points move with the common motion.
            assert_relative_eq!(
                motion * before.nearest_points[0],
                after.nearest_points[0],
                epsilon = 1.0e-4
            );
        }
    }
}

#[test]
fn gjk_and_epa_agree_on_intersection() {
    let mut rng = StdRng::seed_from_u64(7);
    let c1 = Shape::from(Cuboid::new(Vector::new(0.8, 0.5, 0.6)));
    let c2 = Shape::from(Capsule::new(0.7, 0.3));

    for _ in 0..100 {
        let t1 = random_isometry(&mut rng, 1.5);
        let t2 = random_isometry(&mut rng, 1.5);

        let d = shape_distance(&c1, &t1, &c2, &t2, true).unwrap();
        let hit = shape_intersect(&c1, &t1, &c2, &t2).unwrap();

        if d.dist > 1.0e-6 {
            assert!(hit.is_none(), "positive distance but intersection reported");
        }
        if let Some(contact) = hit {
            assert_relative_eq!(contact.depth, -d.dist.min(0.0), epsilon = 1.0e-4);
        }
    }
}

#[test]
fn bvh_nodes_enclose_sampled_leaves() {
    let mut rng = StdRng::seed_from_u64(1234);

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for i in 0..60u32 {
        let base = Point::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        );
        vertices.push(base);
        vertices.push(base + Vector::new(rng.gen_range(0.1..0.5), 0.0, 0.1));
        vertices.push(base + Vector::new(0.0, rng.gen_range(0.1..0.5), 0.1));
        triangles.push([3 * i, 3 * i + 1, 3 * i + 2]);
    }

    for kind in [
        BvKind::Aabb,
        BvKind::Obb,
        BvKind::Rss,
        BvKind::ObbRss,
        BvKind::Kios,
        BvKind::Kdop16,
        BvKind::Kdop18,
        BvKind::Kdop24,
    ] {
        let model = BvhModel::new(vertices.clone(), triangles.clone(), kind).unwrap();

        // Walk each leaf up to the root and check enclosure of its
        // triangle, through the conservative enclosing AABB.
        for (id, node) in model.nodes().iter().enumerate() {
            if !node.is_leaf() {
                continue;
            }
            let pts = model.triangle_points(node.primitive);
            let mut current = 0i32;
            loop {
                let n = model.node(current);
                let aabb = n.bv.aabb().loosened(1.0e-6);
                for pt in &pts {
                    assert!(aabb.contains_local_point(pt), "{kind:?} node {current}");
                }
                if n.is_leaf() {
                    break;
                }
                // Follow the child whose subtree holds this leaf.
                let left_covers = subtree_contains(&model, n.left, id as i32);
                current = if left_covers { n.left } else { n.right };
            }
        }
    }
}

fn subtree_contains(model: &BvhModel, root: i32, target: i32) -> bool {
    if root < 0 {
        return false;
    }
    if root == target {
        return true;
    }
    let node = model.node(root);
    if node.is_leaf() {
        return false;
    }
    subtree_contains(model, node.left, target) || subtree_contains(model, node.right, target)
}

#[test]
fn min_distance_is_a_lower_envelope_of_leaf_pairs() {
    // The reported mesh distance can never undercut the distance of
    // the closest leaf pair computed directly.
    let mut rng = StdRng::seed_from_u64(99);

    let mut make_mesh = |offset: Real| {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        for i in 0..8u32 {
            let base = Point::new(
                offset + rng.gen_range(-0.5..0.5),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            vertices.push(base);
            vertices.push(base + Vector::new(0.3, 0.0, 0.0));
            vertices.push(base + Vector::new(0.0, 0.3, 0.0));
            triangles.push([3 * i, 3 * i + 1, 3 * i + 2]);
        }
        BvhModel::new(vertices, triangles, BvKind::Rss).unwrap()
    };

    let m1 = make_mesh(0.0);
    let m2 = make_mesh(4.0);

    let res = distance(
        &Geometry::Bvh(m1.clone()),
        &Isometry::identity(),
        &Geometry::Bvh(m2.clone()),
        &Isometry::identity(),
        &DistanceRequest::default(),
    )
    .unwrap();

    // Brute-force over all leaf pairs.
    let mut brute = Real::MAX;
    for t1 in 0..m1.triangles().len() as u32 {
        for t2 in 0..m2.triangles().len() as u32 {
            let a = m1.triangle_points(t1);
            let b = m2.triangle_points(t2);
            let s1 = Shape::from(prox3d::shape::Triangle::new(a[0], a[1], a[2]));
            let s2 = Shape::from(prox3d::shape::Triangle::new(b[0], b[1], b[2]));
            let d = shape_distance(&s1, &Isometry::identity(), &s2, &Isometry::identity(), false)
                .unwrap();
            brute = brute.min(d.dist);
        }
    }

    assert_relative_eq!(res.min_distance, brute, epsilon = 1.0e-5);
}
