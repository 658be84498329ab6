//! Ray casting and distance for a single ring.

use geo_types::{Coord, LineString};

/// Even-odd ray casting test for one implicitly closed ring.
///
/// Casts a horizontal ray towards +x and toggles on every edge that strictly
/// straddles the point's y. Points exactly on a horizontal edge or a vertex
/// get whichever side the arithmetic lands on.
pub fn ring_contains(point: Coord<f64>, ring: &LineString<f64>) -> bool {
    let coords = &ring.0;
    if coords.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = coords.len() - 1;

    for i in 0..coords.len() {
        let (xi, yi) = (coords[i].x, coords[i].y);
        let (xj, yj) = (coords[j].x, coords[j].y);

        if (yi > point.y) != (yj > point.y) {
            let x_intersect = (xj - xi) * (point.y - yi) / (yj - yi) + xi;
            if point.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Minimum planar distance from `point` to any edge of the closed ring.
///
/// Returns `f64::INFINITY` for an empty ring.
pub fn ring_distance(point: Coord<f64>, ring: &LineString<f64>) -> f64 {
    let coords = &ring.0;
    match coords.len() {
        0 => f64::INFINITY,
        1 => point_distance(point, coords[0]),
        n => {
            let mut best = f64::INFINITY;
            let mut j = n - 1;
            for i in 0..n {
                best = best.min(segment_distance(point, coords[j], coords[i]));
                j = i;
            }
            best
        }
    }
}

fn point_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance to segment `a`-`b`, clamping the projection to the segment
fn segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return point_distance(p, a);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    point_distance(
        p,
        Coord {
            x: a.x + t * dx,
            y: a.y + t * dy,
        },
    )
}
