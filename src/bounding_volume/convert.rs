//! Cross-kind bounding-volume conversion.

use crate::bounding_volume::{Aabb, Bv, BvKind, Kdop, Kios, Obb, ObbRss, Rss};
use crate::math::{Isometry, Vector};

/// Transforms `src` by `tf` and expresses the result in the `dst`
/// kind.
///
/// Every pair of kinds is supported. The oriented pairs with a tight
/// closed form are converted directly; everything else goes through an
/// intermediate AABB, which is always conservative.
pub fn convert_bv(src: &Bv, tf: &Isometry, dst: BvKind) -> Bv {
    match (src, dst) {
        // The loose-but-fast AABB contract: center under `tf`, extend
        // by the half-diagonal.
        (_, BvKind::Aabb) => Bv::Aabb(inflated_world_aabb(src, tf)),

        (Bv::Aabb(a), BvKind::Obb) => Bv::Obb(obb_of_aabb(a, tf)),
        (Bv::Obb(o), BvKind::Obb) => Bv::Obb(o.transform_by(tf)),
        (Bv::Rss(r), BvKind::Obb) => Bv::Obb(obb_of_rss(r, tf)),
        (Bv::ObbRss(c), BvKind::Obb) => Bv::Obb(c.obb.transform_by(tf)),

        (Bv::Aabb(a), BvKind::Rss) => Bv::Rss(Rss::from_aabb(a).transform_by(tf)),
        (Bv::Obb(o), BvKind::Rss) => Bv::Rss(rss_of_obb(o, tf)),
        (Bv::Rss(r), BvKind::Rss) => Bv::Rss(r.transform_by(tf)),
        (Bv::ObbRss(c), BvKind::Rss) => Bv::Rss(c.rss.transform_by(tf)),

        (Bv::Aabb(a), BvKind::ObbRss) => Bv::ObbRss(ObbRss {
            obb: obb_of_aabb(a, tf),
            rss: Rss::from_aabb(a).transform_by(tf),
        }),
        (Bv::Obb(o), BvKind::ObbRss) => Bv::ObbRss(ObbRss {
            obb: o.transform_by(tf),
            rss: rss_of_obb(o, tf),
        }),
        (Bv::Rss(r), BvKind::ObbRss) => Bv::ObbRss(ObbRss {
            obb: obb_of_rss(r, tf),
            rss: r.transform_by(tf),
        }),
        (Bv::ObbRss(c), BvKind::ObbRss) => Bv::ObbRss(c.transform_by(tf)),

        (Bv::Kios(k), BvKind::Kios) => Bv::Kios(k.transform_by(tf)),

        // No tight closed form: convert through an intermediate AABB.
        (_, _) => {
            let aabb = inflated_world_aabb(src, tf);
            match dst {
                BvKind::Obb => Bv::Obb(Obb::from_aabb(&aabb)),
                BvKind::Rss => Bv::Rss(Rss::from_aabb(&aabb)),
                BvKind::ObbRss => Bv::ObbRss(ObbRss::from_aabb(&aabb)),
                BvKind::Kios => Bv::Kios(Kios::from_aabb(&aabb)),
                BvKind::Kdop16 => Bv::Kdop16(Kdop::from_points(aabb.vertices().iter())),
                BvKind::Kdop18 => Bv::Kdop18(Kdop::from_points(aabb.vertices().iter())),
                BvKind::Kdop24 => Bv::Kdop24(Kdop::from_points(aabb.vertices().iter())),
                BvKind::Aabb => unreachable!(),
            }
        }
    }
}

// Center under `tf`, extended by the half-diagonal norm of the local
// enclosing AABB.
fn inflated_world_aabb(src: &Bv, tf: &Isometry) -> Aabb {
    let local = src.aabb();
    let center = tf * local.center();
    let radius = local.extents().norm() * 0.5;
    Aabb::from_half_extents(center, Vector::repeat(radius))
}

fn obb_of_aabb(aabb: &Aabb, tf: &Isometry) -> Obb {
    Obb::new(
        tf * aabb.center(),
        tf.rotation.to_rotation_matrix().into_inner(),
        aabb.half_extents(),
    )
}

fn obb_of_rss(rss: &Rss, tf: &Isometry) -> Obb {
    Obb::new(
        tf * rss.origin,
        tf.rotation.to_rotation_matrix().into_inner() * rss.axes,
        Vector::new(
            rss.lengths[0] * 0.5 + rss.radius,
            rss.lengths[1] * 0.5 + rss.radius,
            rss.radius,
        ),
    )
}

fn rss_of_obb(obb: &Obb, tf: &Isometry) -> Rss {
    let radius = obb.half_extents.z;
    Rss::new(
        tf * obb.center,
        tf.rotation.to_rotation_matrix().into_inner() * obb.axes,
        [
            ((obb.half_extents.x - radius) * 2.0).max(0.0),
            ((obb.half_extents.y - radius) * 2.0).max(0.0),
        ],
        radius,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{Point, Real};

    #[test]
    fn aabb_to_aabb_is_the_half_diagonal_sphere() {
        let aabb = Aabb::new(Point::new(-1.0, -2.0, -3.0), Point::new(1.0, 2.0, 3.0));
        let tf = Isometry::rotation(Vector::y() * 1.3);
        let out = convert_bv(&Bv::Aabb(aabb), &tf, BvKind::Aabb);

        let Bv::Aabb(out) = out else { unreachable!() };
        let r = (Vector::new(2.0, 4.0, 6.0)).norm() * 0.5;
        assert_relative_eq!(out.half_extents(), Vector::repeat(r), epsilon = 1.0e-9);

        // Conservatism: the rotated original corners stay inside.
        for pt in aabb.vertices() {
            assert!(out.contains_local_point(&(tf * pt)));
        }
    }

    #[test]
    fn aabb_obb_aabb_round_trip_is_a_bounded_superset() {
        let aabb = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 1.0, 1.0));
        let tf = Isometry::identity();

        let obb = convert_bv(&Bv::Aabb(aabb), &tf, BvKind::Obb);
        let back = convert_bv(&obb, &tf, BvKind::Aabb);
        let Bv::Aabb(back) = back else { unreachable!() };

        for pt in aabb.vertices() {
            assert!(back.contains_local_point(&pt));
        }
        assert!(back.size() <= aabb.size() * (3.0 as Real).sqrt() + 1.0e-9);
    }

    #[test]
    fn rss_to_obb_uses_the_inflated_rectangle() {
        let rss = Rss::new(
            Point::new(1.0, 0.0, 0.0),
            na::Matrix3::identity(),
            [4.0, 2.0],
            0.5,
        );
        let out = convert_bv(&Bv::Rss(rss), &Isometry::identity(), BvKind::Obb);
        let Bv::Obb(out) = out else { unreachable!() };
        assert_relative_eq!(out.half_extents, Vector::new(2.5, 1.5, 0.5));
        assert_relative_eq!(out.center, Point::new(1.0, 0.0, 0.0));
    }
}
