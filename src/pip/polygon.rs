//! Point-in-polygon for a single polygon.

use geo_types::{Coord, Polygon};
use serde::{Deserialize, Serialize};

use super::ring::ring_contains;

/// How interior rings are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolePolicy {
    /// Test the exterior ring only; holes are ignored
    #[default]
    OuterOnly,
    /// A point inside any hole is outside the polygon
    SubtractHoles,
}

/// Ray-cast the exterior, then rule out holes if `policy` asks for it
pub fn polygon_contains(point: Coord<f64>, polygon: &Polygon<f64>, policy: HolePolicy) -> bool {
    if !ring_contains(point, polygon.exterior()) {
        return false;
    }

    match policy {
        HolePolicy::OuterOnly => true,
        HolePolicy::SubtractHoles => !polygon
            .interiors()
            .iter()
            .any(|hole| ring_contains(point, hole)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, LineString};

    fn donut() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(vec![
                (4.0, 4.0),
                (6.0, 4.0),
                (6.0, 6.0),
                (4.0, 6.0),
            ])],
        )
    }

    #[test]
    fn test_outer_only_ignores_hole() {
        assert!(polygon_contains(
            coord! { x: 5.0, y: 5.0 },
            &donut(),
            HolePolicy::OuterOnly
        ));
    }

    #[test]
    fn test_subtract_holes() {
        let p = donut();
        assert!(!polygon_contains(
            coord! { x: 5.0, y: 5.0 },
            &p,
            HolePolicy::SubtractHoles
        ));
        assert!(polygon_contains(
            coord! { x: 2.0, y: 2.0 },
            &p,
            HolePolicy::SubtractHoles
        ));
    }

    #[test]
    fn test_outside_exterior_regardless_of_policy() {
        let p = donut();
        for policy in [HolePolicy::OuterOnly, HolePolicy::SubtractHoles] {
            assert!(!polygon_contains(coord! { x: 11.0, y: 5.0 }, &p, policy));
        }
    }
}
