use approx::assert_relative_eq;
use prox3d::bounding_volume::BvKind;
use prox3d::bvh::{unit_quad_mesh, BvhModel};
use prox3d::math::{Isometry, Point, Vector};
use prox3d::shape::{Cuboid, Shape, Sphere};
use prox3d::traversal::{
    collide, distance, CollisionRequest, Contact, DistanceRequest, Geometry,
};

fn sphere(radius: f64) -> Geometry {
    Geometry::Shape(Shape::from(Sphere::new(radius)))
}

#[test]
fn unit_spheres_at_rest_distance() {
    let g = sphere(1.0);
    let res = distance(
        &g,
        &Isometry::identity(),
        &g,
        &Isometry::translation(3.0, 0.0, 0.0),
        &DistanceRequest::default(),
    )
    .unwrap();

    assert_relative_eq!(res.min_distance, 1.0, epsilon = 1.0e-6);
    assert_relative_eq!(res.nearest_points[0], Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
    assert_relative_eq!(res.nearest_points[1], Point::new(2.0, 0.0, 0.0), epsilon = 1.0e-6);

    // The normal follows the witness difference.
    let normal = res.normal.unwrap();
    let expected = (res.nearest_points[0] - res.nearest_points[1]).normalize();
    assert_relative_eq!(*normal, expected, epsilon = 1.0e-6);
    assert_relative_eq!(normal.x.abs(), 1.0, epsilon = 1.0e-6);
}

#[test]
fn unit_spheres_penetrating() {
    let g = sphere(1.0);
    let req = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let res = collide(
        &g,
        &Isometry::identity(),
        &g,
        &Isometry::translation(1.5, 0.0, 0.0),
        &req,
    )
    .unwrap();

    assert!(res.is_collision());
    let details = res.contacts[0].details.unwrap();
    assert_relative_eq!(details.depth, 0.5, epsilon = 1.0e-6);
    assert_relative_eq!(details.normal.x.abs(), 1.0, epsilon = 1.0e-3);
}

#[test]
fn boxes_overlap_along_x() {
    let g = Geometry::Shape(Shape::from(Cuboid::new(Vector::new(1.0, 1.0, 1.0))));
    let req = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let res = collide(
        &g,
        &Isometry::identity(),
        &g,
        &Isometry::translation(1.9, 0.0, 0.0),
        &req,
    )
    .unwrap();

    assert!(res.is_collision());
    let details = res.contacts[0].details.unwrap();
    assert_relative_eq!(details.depth, 0.1, epsilon = 1.0e-6);
    assert_relative_eq!(details.normal.x.abs(), 1.0, epsilon = 1.0e-6);
}

#[test]
fn sphere_against_triangle_mesh() {
    let vertices = vec![
        Point::new(-1.0, -1.0, 0.0),
        Point::new(1.0, -1.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ];
    let mesh = Geometry::Bvh(BvhModel::new(vertices, vec![[0, 1, 2]], BvKind::Obb).unwrap());
    let ball = sphere(0.5);

    let req = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let res = collide(
        &ball,
        &Isometry::translation(0.0, 0.0, 0.4),
        &mesh,
        &Isometry::identity(),
        &req,
    )
    .unwrap();

    assert!(res.is_collision());
    let contact = res.contacts[0];
    assert_eq!(contact.b1, Contact::NONE);
    assert_eq!(contact.b2, 0);

    let details = contact.details.unwrap();
    assert_relative_eq!(details.pos, Point::new(0.0, 0.0, 0.0), epsilon = 1.0e-9);
    assert_relative_eq!(details.depth, 0.1, epsilon = 1.0e-9);
    assert_relative_eq!(*details.normal, Vector::z(), epsilon = 1.0e-9);
}

#[test]
fn disjoint_meshes_report_the_gap() {
    let (vertices, triangles) = unit_quad_mesh();
    for kind in [BvKind::Aabb, BvKind::Obb, BvKind::Rss, BvKind::ObbRss] {
        let mesh1 = Geometry::Bvh(
            BvhModel::new(vertices.clone(), triangles.clone(), kind).unwrap(),
        );
        let mesh2 = mesh1.clone();
        let shift = Isometry::translation(6.0, 0.0, 0.0);

        let col = collide(
            &mesh1,
            &Isometry::identity(),
            &mesh2,
            &shift,
            &CollisionRequest::default(),
        )
        .unwrap();
        assert!(!col.is_collision(), "{kind:?}");

        let dist = distance(
            &mesh1,
            &Isometry::identity(),
            &mesh2,
            &shift,
            &DistanceRequest::default(),
        )
        .unwrap();
        // The quads span x in [-0.5, 0.5]; the world AABB gap is 5.
        assert_relative_eq!(dist.min_distance, 5.0, epsilon = 1.0e-5);
        assert!(col.distance_lower_bound <= dist.min_distance + 1.0e-5, "{kind:?}");
    }
}

#[test]
fn contact_cap_is_honored() {
    let (vertices, triangles) = unit_quad_mesh();
    let mesh = Geometry::Bvh(BvhModel::new(vertices, triangles, BvKind::Aabb).unwrap());

    // Coplanar overlapping quads touch on both triangles of each side.
    let req = CollisionRequest {
        max_contacts: 1,
        ..Default::default()
    };
    let res = collide(
        &mesh,
        &Isometry::identity(),
        &mesh,
        &Isometry::translation(0.1, 0.0, 0.0),
        &req,
    )
    .unwrap();
    assert_eq!(res.contacts.len(), 1);

    let req = CollisionRequest {
        max_contacts: 16,
        ..Default::default()
    };
    let res = collide(
        &mesh,
        &Isometry::identity(),
        &mesh,
        &Isometry::translation(0.1, 0.0, 0.0),
        &req,
    )
    .unwrap();
    assert!(res.contacts.len() > 1);
    assert!(res.contacts.len() <= 16);
}

#[test]
fn security_margin_reports_near_misses() {
    let g = sphere(1.0);
    let t2 = Isometry::translation(2.5, 0.0, 0.0);

    let strict = collide(
        &g,
        &Isometry::identity(),
        &g,
        &t2,
        &CollisionRequest::default(),
    )
    .unwrap();
    assert!(!strict.is_collision());
    assert_relative_eq!(strict.distance_lower_bound, 0.5, epsilon = 1.0e-6);

    let padded = collide(
        &g,
        &Isometry::identity(),
        &g,
        &t2,
        &CollisionRequest {
            security_margin: 0.6,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(padded.is_collision());
}

#[test]
fn non_finite_inputs_are_rejected() {
    let g = sphere(1.0);
    let bad = Isometry::translation(f64::NAN, 0.0, 0.0);
    let err = collide(&g, &bad, &g, &Isometry::identity(), &CollisionRequest::default());
    assert!(matches!(err, Err(prox3d::QueryError::InvalidGeometry(_))));

    let bad_shape = Geometry::Shape(Shape::from(Sphere::new(f64::INFINITY)));
    let err = distance(
        &g,
        &Isometry::identity(),
        &bad_shape,
        &Isometry::identity(),
        &DistanceRequest::default(),
    );
    assert!(matches!(err, Err(prox3d::QueryError::InvalidGeometry(_))));
}

#[test]
fn mesh_against_shape_distance() {
    let (vertices, triangles) = unit_quad_mesh();
    let mesh = Geometry::Bvh(BvhModel::new(vertices, triangles, BvKind::Rss).unwrap());
    let ball = sphere(0.25);

    let res = distance(
        &mesh,
        &Isometry::identity(),
        &ball,
        &Isometry::translation(0.0, 0.0, 2.0),
        &DistanceRequest::default(),
    )
    .unwrap();

    assert_relative_eq!(res.min_distance, 1.75, epsilon = 1.0e-6);
    assert_relative_eq!(res.nearest_points[0], Point::new(0.0, 0.0, 0.0), epsilon = 1.0e-5);
}
