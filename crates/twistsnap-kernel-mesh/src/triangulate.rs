//! Ear-clipping triangulation of simple 2D polygons.

use twistsnap_kernel_math::Point2;

/// Signed area of a closed 2D loop (positive when counter-clockwise).
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Triangulate a simple polygon by ear clipping.
///
/// Works for either winding; every returned triangle keeps the winding of
/// the input loop. If no ear can be found (self-intersecting input) the
/// remaining vertices are fanned.
pub fn ear_clip(points: &[Point2]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let ccw = signed_area_2d(points) >= 0.0;
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut out = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let mut found_ear = false;

        for i in 0..m {
            let prev = (i + m - 1) % m;
            let next = (i + 1) % m;
            let a = points[remaining[prev]];
            let b = points[remaining[i]];
            let c = points[remaining[next]];

            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            let is_convex = if ccw { cross > 1e-14 } else { cross < -1e-14 };
            if !is_convex {
                continue;
            }

            let blocked = (0..m)
                .filter(|&j| j != prev && j != i && j != next)
                .any(|j| {
                    let p = points[remaining[j]];
                    // Duplicate vertices (from touching loops) never block an ear.
                    p != a && p != b && p != c && point_in_triangle_2d(&p, &a, &b, &c)
                });
            if blocked {
                continue;
            }

            out.push([remaining[prev], remaining[i], remaining[next]]);
            remaining.remove(i);
            found_ear = true;
            break;
        }

        if !found_ear {
            break;
        }
    }

    for i in 1..remaining.len().saturating_sub(1) {
        out.push([remaining[0], remaining[i], remaining[i + 1]]);
    }
    out
}

/// Inclusive point-in-triangle test (barycentric).
fn point_in_triangle_2d(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-300 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    let eps = 1e-10;
    u >= -eps && v >= -eps && (u + v) <= 1.0 + eps
}
