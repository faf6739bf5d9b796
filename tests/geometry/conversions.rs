use approx::assert_relative_eq;
use prox3d::bounding_volume::{convert_bv, Aabb, Bv, BvKind};
use prox3d::math::{Isometry, Point, Real, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_aabb(rng: &mut StdRng) -> Aabb {
    let center = Point::new(
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
    );
    let half = Vector::new(
        rng.gen_range(0.1..2.0),
        rng.gen_range(0.1..2.0),
        rng.gen_range(0.1..2.0),
    );
    Aabb::from_half_extents(center, half)
}

fn random_isometry(rng: &mut StdRng) -> Isometry {
    Isometry::new(
        Vector::new(
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
        ),
        Vector::new(
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-3.0..3.0),
        ),
    )
}

// Sample points of the source box, under the transform they must stay
// inside the converted volume.
fn sample_points(aabb: &Aabb, rng: &mut StdRng) -> Vec<Point> {
    let mut pts: Vec<Point> = aabb.vertices().to_vec();
    for _ in 0..32 {
        let t = Vector::new(rng.gen::<Real>(), rng.gen::<Real>(), rng.gen::<Real>());
        pts.push(Point::from(
            aabb.mins.coords + (aabb.maxs - aabb.mins).component_mul(&t),
        ));
    }
    pts
}

#[test]
fn conversions_from_aabb_are_conservative() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..20 {
        let aabb = random_aabb(&mut rng);
        let tf = random_isometry(&mut rng);
        let pts = sample_points(&aabb, &mut rng);

        for dst in [
            BvKind::Aabb,
            BvKind::Obb,
            BvKind::ObbRss,
            BvKind::Kios,
            BvKind::Kdop16,
            BvKind::Kdop18,
            BvKind::Kdop24,
        ] {
            let out = convert_bv(&Bv::Aabb(aabb), &tf, dst);
            assert_eq!(out.kind(), dst);
            for pt in &pts {
                let moved = tf * pt;
                // Composite kinds answer containment through their
                // tightest member; allow a whisker of slack.
                assert!(
                    out.aabb().loosened(1.0e-7).contains_local_point(&moved),
                    "{dst:?} lost a point"
                );
            }
        }
    }
}

#[test]
fn oriented_conversions_are_conservative() {
    let mut rng = StdRng::seed_from_u64(77);

    for _ in 0..20 {
        let aabb = random_aabb(&mut rng);
        let to_obb = random_isometry(&mut rng);
        let obb = convert_bv(&Bv::Aabb(aabb), &to_obb, BvKind::Obb);
        let tf = random_isometry(&mut rng);

        for dst in [BvKind::Aabb, BvKind::Obb, BvKind::Kdop24, BvKind::Kios] {
            let out = convert_bv(&obb, &tf, dst);
            for pt in sample_points(&aabb, &mut rng) {
                let moved = tf * (to_obb * pt);
                assert!(
                    out.aabb().loosened(1.0e-7).contains_local_point(&moved),
                    "{dst:?} lost a point"
                );
            }
        }
    }
}

#[test]
fn aabb_obb_aabb_round_trip_bound() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let aabb = random_aabb(&mut rng);
        let obb = convert_bv(&Bv::Aabb(aabb), &Isometry::identity(), BvKind::Obb);
        let back = convert_bv(&obb, &Isometry::identity(), BvKind::Aabb);
        let Bv::Aabb(back) = back else { unreachable!() };

        for pt in aabb.vertices() {
            assert!(back.contains_local_point(&pt));
        }
        assert!(back.size() <= aabb.size() * (3.0 as Real).sqrt() + 1.0e-9);
    }
}

#[test]
fn rss_conversion_follows_the_extent_sort() {
    let aabb = Aabb::new(Point::new(-4.0, -1.0, -2.0), Point::new(4.0, 1.0, 2.0));
    let out = convert_bv(&Bv::Aabb(aabb), &Isometry::identity(), BvKind::Rss);
    let Bv::Rss(rss) = out else { unreachable!() };

    // Extents sorted decreasing: x (8), z (4), y (2); the smallest
    // half-extent becomes the radius.
    assert_relative_eq!(rss.radius, 1.0);
    assert_relative_eq!(rss.lengths[0], 6.0);
    assert_relative_eq!(rss.lengths[1], 2.0);
    assert_relative_eq!(rss.axes.determinant(), 1.0, epsilon = 1.0e-12);
}
