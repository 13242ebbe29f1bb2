//! Triangle/box intersection test by Tomas Akenine-Möller:
//! <https://fileadmin.cs.lth.se/cs/Personal/Tomas_Akenine-Moller/code/tribox_tam.pdf>

use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector};
use crate::shape::Triangle;

/// Tests if a triangle intersects an AABB.
///
/// This is a 13-axis separating-axis test: the nine edge/coordinate-axis
/// cross products, the three coordinate axes, and the triangle's plane.
/// Configurations that merely touch the box's boundary count as
/// intersecting, so the test never produces a false negative.
pub fn intersection_test_aabb_triangle(aabb: &Aabb, triangle: &Triangle) -> bool {
    let center = aabb.center();
    let h = aabb.half_extents();

    // Work in the box's local frame.
    let v0 = triangle.a - center;
    let v1 = triangle.b - center;
    let v2 = triangle.c - center;

    // The nine edge/coordinate-axis cross products. Each edge projects two of
    // the three vertices onto the same value, so only two projections are
    // computed per axis.
    let e = v1 - v0;
    let f = e.abs();
    if separated_on_axis(e.z * v0.y - e.y * v0.z, e.z * v2.y - e.y * v2.z, f.z * h.y + f.y * h.z)
        || separated_on_axis(e.z * v0.x - e.x * v0.z, e.z * v2.x - e.x * v2.z, f.z * h.x + f.x * h.z)
        || separated_on_axis(e.y * v1.x - e.x * v1.y, e.y * v2.x - e.x * v2.y, f.y * h.x + f.x * h.y)
    {
        return false;
    }

    let e = v2 - v1;
    let f = e.abs();
    if separated_on_axis(e.z * v0.y - e.y * v0.z, e.z * v2.y - e.y * v2.z, f.z * h.y + f.y * h.z)
        || separated_on_axis(e.z * v0.x - e.x * v0.z, e.z * v2.x - e.x * v2.z, f.z * h.x + f.x * h.z)
        || separated_on_axis(e.y * v0.x - e.x * v0.y, e.y * v1.x - e.x * v1.y, f.y * h.x + f.x * h.y)
    {
        return false;
    }

    let e = v0 - v2;
    let f = e.abs();
    if separated_on_axis(e.z * v0.y - e.y * v0.z, e.z * v1.y - e.y * v1.z, f.z * h.y + f.y * h.z)
        || separated_on_axis(e.z * v0.x - e.x * v0.z, e.z * v1.x - e.x * v1.z, f.z * h.x + f.x * h.z)
        || separated_on_axis(e.y * v1.x - e.x * v1.y, e.y * v2.x - e.x * v2.y, f.y * h.x + f.x * h.y)
    {
        return false;
    }

    // The three coordinate-axis interval tests.
    for i in 0..3 {
        let min = v0[i].min(v1[i]).min(v2[i]);
        let max = v0[i].max(v1[i]).max(v2[i]);
        if min > h[i] || max < -h[i] {
            return false;
        }
    }

    // The triangle's supporting plane against the box.
    let normal = (v1 - v0).cross(&(v2 - v1));
    let d = -normal.dot(&v0);
    aabb_intersects_plane(&normal, d, &h)
}

#[inline]
fn separated_on_axis(p0: Real, p1: Real, rad: Real) -> bool {
    let (min, max) = if p0 < p1 { (p0, p1) } else { (p1, p0) };
    min > rad || max < -rad
}

fn aabb_intersects_plane(normal: &Vector<Real>, d: Real, half_extents: &Vector<Real>) -> bool {
    let mut vmin = Vector::zeros();
    let mut vmax = Vector::zeros();

    for i in 0..3 {
        if normal[i] > 0.0 {
            vmin[i] = -half_extents[i];
            vmax[i] = half_extents[i];
        } else {
            vmin[i] = half_extents[i];
            vmax[i] = -half_extents[i];
        }
    }

    if normal.dot(&vmin) + d > 0.0 {
        return false;
    }

    normal.dot(&vmax) + d >= 0.0
}

#[cfg(test)]
mod test {
    use super::intersection_test_aabb_triangle;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use crate::shape::Triangle;

    fn unit_box() -> Aabb {
        Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5))
    }

    #[test]
    fn triangle_crossing_box_intersects() {
        let tri = Triangle::new(
            Point::new(-1.0, 0.1, 0.0),
            Point::new(1.0, 0.1, 0.0),
            Point::new(0.0, 0.1, 1.0),
        );
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn triangle_outside_box_misses() {
        let tri = Triangle::new(
            Point::new(2.0, 2.0, 2.0),
            Point::new(3.0, 2.0, 2.0),
            Point::new(2.0, 3.0, 2.0),
        );
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri));

        // Separated by an edge cross product only: every coordinate interval
        // overlaps the box and the supporting plane crosses it, but the edge
        // `x + y = 1.1` clears the corner.
        let tri = Triangle::new(
            Point::new(1.1, 0.0, 0.0),
            Point::new(0.0, 1.1, 0.0),
            Point::new(1.1, 1.1, 0.0),
        );
        assert!(!intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn triangle_touching_face_intersects() {
        // Lies exactly on the `x = 0.5` face plane.
        let tri = Triangle::new(
            Point::new(0.5, -0.25, -0.25),
            Point::new(0.5, 0.25, -0.25),
            Point::new(0.5, 0.0, 0.25),
        );
        assert!(intersection_test_aabb_triangle(&unit_box(), &tri));
    }

    #[test]
    fn degenerate_triangle_behaves() {
        let p = Point::new(0.25, 0.25, 0.25);
        let inside = Triangle::new(p, p, p);
        assert!(intersection_test_aabb_triangle(&unit_box(), &inside));

        let q = Point::new(4.0, 0.0, 0.0);
        let outside = Triangle::new(q, q, q);
        assert!(!intersection_test_aabb_triangle(&unit_box(), &outside));
    }

    #[test]
    fn vertex_permutation_invariance() {
        let pts = [
            Point::new(-0.9, 0.3, 0.2),
            Point::new(0.8, -0.6, 0.4),
            Point::new(0.1, 0.9, -0.7),
        ];
        let perms = [
            [0, 1, 2],
            [1, 2, 0],
            [2, 0, 1],
            [0, 2, 1],
            [2, 1, 0],
            [1, 0, 2],
        ];

        for shift in 0..8 {
            // A few boxes at different offsets, including ones the triangle misses.
            let center = Point::new(shift as f32 * 0.4 - 1.0, 0.0, 0.0);
            let aabb = Aabb::from_half_extents(center, Vector::repeat(0.5));
            let reference = intersection_test_aabb_triangle(
                &aabb,
                &Triangle::new(pts[0], pts[1], pts[2]),
            );

            for perm in &perms {
                let tri = Triangle::new(pts[perm[0]], pts[perm[1]], pts[perm[2]]);
                assert_eq!(intersection_test_aabb_triangle(&aabb, &tri), reference);
            }
        }
    }
}
