//! Point-in-shape tests used to route taps to widgets.
//!
//! All inputs are in screen coordinates: origin top-left, Y growing down.

use nannou::geom::Point2;

pub fn point_in_circle(p: Point2, center: Point2, radius: f32) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Inclusive on every edge.
pub fn point_in_rect(p: Point2, pos: Point2, size: Point2) -> bool {
    let a = p.x - pos.x;
    let b = p.y - pos.y;
    a >= 0.0 && b >= 0.0 && a <= size.x && b <= size.y
}

/// `a`, `b`, `c` must be wound counter-clockwise as seen on screen.
/// Winding is not checked: a clockwise triple reports every interior point
/// as outside. See [`is_counter_clockwise`].
pub fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    in_cone(p, a, b, c) && in_cone(p, b, c, a)
}

/// Wedge with its apex at `apex`, bounded by the rays towards `left` and
/// `right`.
fn in_cone(x: Point2, apex: Point2, left: Point2, right: Point2) -> bool {
    // apex to origin, then flip to Y-up
    let x = flip(x - apex);
    let b = flip(left - apex);
    let c = flip(right - apex);

    b.y * x.x - b.x * x.y <= 0.0 && c.y * x.x - c.x * x.y >= 0.0
}

fn flip(v: Point2) -> Point2 {
    Point2::new(v.x, -v.y)
}

/// Whether `a -> b -> c` turns counter-clockwise on a Y-down screen.
pub fn is_counter_clockwise(a: Point2, b: Point2, c: Point2) -> bool {
    let ab = b - a;
    let ac = c - a;
    // Y-down flips the sign of the usual cross product
    ab.x * ac.y - ab.y * ac.x < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::geom::pt2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn circle_includes_its_rim() {
        let c = pt2(10.0, 10.0);
        assert!(point_in_circle(pt2(10.0, 10.0), c, 5.0));
        assert!(point_in_circle(pt2(15.0, 10.0), c, 5.0));
        assert!(!point_in_circle(pt2(14.0, 14.0), c, 5.0));
    }

    #[test]
    fn rect_interior_and_edges_hit() {
        let pos = pt2(100.0, 50.0);
        let size = pt2(40.0, 20.0);

        for p in [pt2(120.0, 60.0), pt2(100.1, 50.1), pt2(139.9, 69.9)] {
            assert!(point_in_rect(p, pos, size), "{p:?}");
        }
        for p in [pt2(100.0, 50.0), pt2(140.0, 70.0), pt2(100.0, 70.0), pt2(120.0, 50.0)] {
            assert!(point_in_rect(p, pos, size), "edge {p:?}");
        }
    }

    #[test]
    fn rect_rejects_either_axis_outside() {
        let pos = pt2(100.0, 50.0);
        let size = pt2(40.0, 20.0);

        for p in [
            pt2(99.9, 60.0),
            pt2(140.1, 60.0),
            pt2(120.0, 49.9),
            pt2(120.0, 70.1),
            pt2(0.0, 0.0),
        ] {
            assert!(!point_in_rect(p, pos, size), "{p:?}");
        }
    }

    #[test]
    fn rect_hit_matches_bounds_for_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let pos = pt2(30.0, 80.0);
        let size = pt2(200.0, 50.0);

        for _ in 0..2_000 {
            let p = pt2(rng.gen_range(0.0..300.0), rng.gen_range(0.0..200.0));
            let rel = p - pos;
            let expected = (0.0..=size.x).contains(&rel.x) && (0.0..=size.y).contains(&rel.y);
            assert_eq!(point_in_rect(p, pos, size), expected, "{p:?}");
        }
    }

    /// Same-sign edge test, independent of winding.
    fn reference_contains(p: Point2, a: Point2, b: Point2, c: Point2) -> Option<bool> {
        let edge = |u: Point2, v: Point2| (v.x - u.x) * (p.y - u.y) - (v.y - u.y) * (p.x - u.x);
        let d = [edge(a, b), edge(b, c), edge(c, a)];
        if d.iter().any(|v| v.abs() < 1e-2) {
            // too close to an edge for two float formulas to agree
            return None;
        }
        let neg = d.iter().any(|&v| v < 0.0);
        let pos = d.iter().any(|&v| v > 0.0);
        Some(!(neg && pos))
    }

    #[test]
    fn triangle_agrees_with_reference_on_random_points() {
        let mut rng = StdRng::seed_from_u64(42);
        // the two volume buttons, plus a skewed one
        let triangles = [
            (pt2(0.0, 80.0), pt2(80.0, 80.0), pt2(40.0, 0.0)),
            (pt2(40.0, 80.0), pt2(80.0, 0.0), pt2(0.0, 0.0)),
            (pt2(5.0, 10.0), pt2(20.0, 95.0), pt2(90.0, 40.0)),
        ];

        for (a, b, c) in triangles {
            assert!(is_counter_clockwise(a, b, c));
            let mut inside = 0;
            for _ in 0..10_000 {
                let p = pt2(rng.gen_range(-10.0..100.0), rng.gen_range(-10.0..100.0));
                if let Some(expected) = reference_contains(p, a, b, c) {
                    assert_eq!(point_in_triangle(p, a, b, c), expected, "{p:?}");
                    inside += expected as usize;
                }
            }
            assert!(inside > 1_000, "sample never landed inside");
        }
    }

    #[test]
    fn triangle_vertices_are_inside() {
        let (a, b, c) = (pt2(0.0, 80.0), pt2(80.0, 80.0), pt2(40.0, 0.0));
        assert!(point_in_triangle(a, a, b, c));
        assert!(point_in_triangle(b, a, b, c));
        assert!(point_in_triangle(c, a, b, c));
    }

    #[test]
    fn clockwise_winding_inverts_the_test() {
        let (a, b, c) = (pt2(0.0, 80.0), pt2(40.0, 0.0), pt2(80.0, 80.0));
        let centroid = pt2(40.0, 160.0 / 3.0);

        assert!(!is_counter_clockwise(a, b, c));
        assert!(!point_in_triangle(centroid, a, b, c));
        assert!(point_in_triangle(centroid, a, c, b));
    }
}
