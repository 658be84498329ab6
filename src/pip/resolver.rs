//! Containment and distance over single and multi-part geometries.

use geo_types::Coord;

use super::polygon::{polygon_contains, HolePolicy};
use super::ring::ring_distance;
use crate::models::Geometry;

/// True if any part of the geometry contains the point
pub fn geometry_contains(point: Coord<f64>, geometry: &Geometry, policy: HolePolicy) -> bool {
    geometry
        .polygons()
        .iter()
        .any(|polygon| polygon_contains(point, polygon, policy))
}

/// Planar distance from the point to the nearest segment of any ring
pub fn boundary_distance(point: Coord<f64>, geometry: &Geometry) -> f64 {
    geometry
        .rings()
        .map(|ring| ring_distance(point, ring))
        .fold(f64::INFINITY, f64::min)
}
