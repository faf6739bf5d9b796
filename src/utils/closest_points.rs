use crate::math::{Point, Real, DEFAULT_EPSILON};
use crate::utils::clamp;

/// Computes the closest points between the segments `[p1, q1]` and
/// `[p2, q2]`.
pub fn closest_points_segment_segment(
    p1: &Point,
    q1: &Point,
    p2: &Point,
    q2: &Point,
) -> (Point, Point) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t);

    if a <= DEFAULT_EPSILON && e <= DEFAULT_EPSILON {
        // Both segments are points.
        s = 0.0;
        t = 0.0;
    } else if a <= DEFAULT_EPSILON {
        s = 0.0;
        t = clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= DEFAULT_EPSILON {
            t = 0.0;
            s = clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            let mut s_ = if denom != 0.0 {
                clamp((b * f - c * e) / denom, 0.0, 1.0)
            } else {
                // Parallel segments: pick an arbitrary point on the first.
                0.0
            };

            let mut t_ = (b * s_ + f) / e;

            if t_ < 0.0 {
                t_ = 0.0;
                s_ = clamp(-c / a, 0.0, 1.0);
            } else if t_ > 1.0 {
                t_ = 1.0;
                s_ = clamp((b - c) / a, 0.0, 1.0);
            }

            s = s_;
            t = t_;
        }
    }

    (p1 + d1 * s, p2 + d2 * t)
}

/// Projects the point `p` onto the triangle `(a, b, c)`.
///
/// Returns the projection together with its barycentric coordinates
/// with respect to `(a, b, c)`. Degenerate triangles fall back to the
/// closest point on their edges.
pub fn closest_point_triangle(p: &Point, a: &Point, b: &Point, c: &Point) -> (Point, [Real; 3]) {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (*a, [1.0, 0.0, 0.0]);
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (*b, [0.0, 1.0, 0.0]);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let denom = d1 - d3;
        if denom > 0.0 {
            let v = d1 / denom;
            return (a + ab * v, [1.0 - v, v, 0.0]);
        }
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (*c, [0.0, 0.0, 1.0]);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let denom = d2 - d6;
        if denom > 0.0 {
            let w = d2 / denom;
            return (a + ac * w, [1.0 - w, 0.0, w]);
        }
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let denom = (d4 - d3) + (d5 - d6);
        if denom > 0.0 {
            let w = (d4 - d3) / denom;
            return (b + (c - b) * w, [0.0, 1.0 - w, w]);
        }
    }

    let sum = va + vb + vc;
    if sum.abs() <= DEFAULT_EPSILON {
        // Degenerate triangle: the closest point lies on one of the edges.
        let candidates = [
            closest_point_on_edge(p, a, b, 0, 1),
            closest_point_on_edge(p, a, c, 0, 2),
            closest_point_on_edge(p, b, c, 1, 2),
        ];
        return candidates
            .into_iter()
            .min_by(|(p1, _), (p2, _)| {
                let d1 = (p1 - p).norm_squared();
                let d2 = (p2 - p).norm_squared();
                d1.partial_cmp(&d2).unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap();
    }

    let denom = 1.0 / sum;
    let v = vb * denom;
    let w = vc * denom;
    (a + ab * v + ac * w, [1.0 - v - w, v, w])
}

fn closest_point_on_edge(
    p: &Point,
    e1: &Point,
    e2: &Point,
    i1: usize,
    i2: usize,
) -> (Point, [Real; 3]) {
    let dir = e2 - e1;
    let sq = dir.norm_squared();
    let t = if sq > 0.0 {
        clamp((p - e1).dot(&dir) / sq, 0.0, 1.0)
    } else {
        0.0
    };
    let mut bcoords = [0.0; 3];
    bcoords[i1] = 1.0 - t;
    bcoords[i2] = t;
    (e1 + dir * t, bcoords)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;

    #[test]
    fn segment_segment_crossing() {
        let (p, q) = closest_points_segment_segment(
            &Point::new(-1.0, 0.0, 1.0),
            &Point::new(1.0, 0.0, 1.0),
            &Point::new(0.0, -1.0, 0.0),
            &Point::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(p, Point::new(0.0, 0.0, 1.0), epsilon = 1.0e-9);
        assert_relative_eq!(q, Point::new(0.0, 0.0, 0.0), epsilon = 1.0e-9);
    }

    #[test]
    fn triangle_projection_regions() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(2.0, 0.0, 0.0);
        let c = Point::new(0.0, 2.0, 0.0);

        // Interior.
        let (p, bc) = closest_point_triangle(&Point::new(0.5, 0.5, 1.0), &a, &b, &c);
        assert_relative_eq!(p, Point::new(0.5, 0.5, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(bc[0] + bc[1] + bc[2], 1.0, epsilon = 1.0e-9);

        // Vertex region.
        let (p, _) = closest_point_triangle(&Point::new(-1.0, -1.0, 0.0), &a, &b, &c);
        assert_relative_eq!(p, a);

        // Edge region.
        let (p, _) = closest_point_triangle(&Point::new(1.0, -1.0, 0.0), &a, &b, &c);
        assert_relative_eq!(p, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-9);
    }
}
