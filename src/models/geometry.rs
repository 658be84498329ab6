//! Boundary geometry as checked by the containment engine.

use geo::BoundingRect;
use geo_types::{LineString, MultiPolygon, Polygon, Rect};

use crate::error::VerifyError;
use crate::pip::HolePolicy;

/// Minimum number of distinct vertices a ring needs to enclose anything.
pub const MIN_RING_POINTS: usize = 3;

/// A feature boundary: either one polygon or several disjoint parts.
///
/// A point inside any part of a `Multi` geometry is inside the whole
/// boundary, which is how exclaves of an administrative area are modelled.
/// `Invalid` keeps a feature whose source geometry could not be decoded in
/// its place in the collection; it has no parts and contains nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Single(Polygon<f64>),
    Multi(MultiPolygon<f64>),
    Invalid { reason: String },
}

impl Geometry {
    /// Normalize to a uniform list of polygons
    pub fn polygons(&self) -> &[Polygon<f64>] {
        match self {
            Geometry::Single(polygon) => std::slice::from_ref(polygon),
            Geometry::Multi(multi) => &multi.0,
            Geometry::Invalid { .. } => &[],
        }
    }

    /// Iterate over every ring (exteriors and holes) of every part
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons()
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
    }

    /// Bounding box of all parts
    pub fn bbox(&self) -> Option<Rect<f64>> {
        match self {
            Geometry::Single(polygon) => polygon.bounding_rect(),
            Geometry::Multi(multi) => multi.bounding_rect(),
            Geometry::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Geometry::Invalid { .. })
    }

    /// Check that the rings `policy` reads have enough distinct, finite vertices.
    ///
    /// Holes are only checked under [`HolePolicy::SubtractHoles`]; the outer-only
    /// test never looks at them.
    pub fn validate(&self, feature: &str, policy: HolePolicy) -> Result<(), VerifyError> {
        if let Geometry::Invalid { reason } = self {
            return Err(VerifyError::invalid_geometry(feature, reason.as_str()));
        }

        let polygons = self.polygons();
        if polygons.is_empty() {
            return Err(VerifyError::invalid_geometry(
                feature,
                "multipolygon has no parts",
            ));
        }

        for (part, polygon) in polygons.iter().enumerate() {
            let holes = match policy {
                HolePolicy::OuterOnly => &[][..],
                HolePolicy::SubtractHoles => polygon.interiors(),
            };
            let rings = std::iter::once(polygon.exterior()).chain(holes);
            for (ring_idx, ring) in rings.enumerate() {
                check_ring(ring).map_err(|reason| {
                    VerifyError::invalid_geometry(
                        feature,
                        format!("part {} ring {} {}", part, ring_idx, reason),
                    )
                })?;
            }
        }

        Ok(())
    }
}

impl From<Polygon<f64>> for Geometry {
    fn from(polygon: Polygon<f64>) -> Self {
        Geometry::Single(polygon)
    }
}

impl From<MultiPolygon<f64>> for Geometry {
    fn from(multi: MultiPolygon<f64>) -> Self {
        Geometry::Multi(multi)
    }
}

/// Ring must be finite and have at least [`MIN_RING_POINTS`] distinct vertices
fn check_ring(ring: &LineString<f64>) -> Result<(), String> {
    if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err("has a non-finite coordinate".to_string());
    }

    let mut distinct = Vec::with_capacity(MIN_RING_POINTS);
    for coord in &ring.0 {
        if !distinct.contains(coord) {
            distinct.push(*coord);
            if distinct.len() == MIN_RING_POINTS {
                return Ok(());
            }
        }
    }

    Err(format!(
        "has {} distinct points (need {})",
        distinct.len(),
        MIN_RING_POINTS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, polygon};

    fn unit_square() -> Polygon<f64> {
        polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)]
    }

    #[test]
    fn test_single_normalizes_to_one_polygon() {
        let geometry = Geometry::from(unit_square());
        assert_eq!(geometry.polygons().len(), 1);
    }

    #[test]
    fn test_multi_keeps_parts() {
        let geometry = Geometry::from(MultiPolygon::new(vec![unit_square(), unit_square()]));
        assert_eq!(geometry.polygons().len(), 2);
        assert_eq!(geometry.rings().count(), 2);
    }

    #[test]
    fn test_bbox_spans_all_parts() {
        let far = polygon![(x: 5.0, y: 5.0), (x: 6.0, y: 5.0), (x: 6.0, y: 6.0), (x: 5.0, y: 6.0)];
        let geometry = Geometry::from(MultiPolygon::new(vec![unit_square(), far]));
        let bbox = geometry.bbox().unwrap();
        assert_eq!(bbox.min(), coord! { x: 0.0, y: 0.0 });
        assert_eq!(bbox.max(), coord! { x: 6.0, y: 6.0 });
    }

    #[test]
    fn test_validate_accepts_square() {
        assert!(Geometry::from(unit_square()).validate("square", HolePolicy::OuterOnly).is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_ring() {
        let sliver = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let err = Geometry::from(sliver).validate("sliver", HolePolicy::OuterOnly).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_multi() {
        let geometry = Geometry::from(MultiPolygon::<f64>::new(vec![]));
        assert!(geometry.validate("empty", HolePolicy::OuterOnly).is_err());
    }

    fn square_with_hole(hole: Vec<(f64, f64)>) -> Geometry {
        Geometry::Single(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(hole)],
        ))
    }

    #[test]
    fn test_degenerate_hole_ignored_outer_only() {
        let geometry = square_with_hole(vec![(4.0, 4.0), (4.0, 4.0), (4.0, 4.0)]);
        assert!(geometry.validate("holey", HolePolicy::OuterOnly).is_ok());
        assert!(geometry
            .validate("holey", HolePolicy::SubtractHoles)
            .is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let ring = LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let geometry = Geometry::from(Polygon::new(ring, vec![]));
        assert!(geometry.validate("nan", HolePolicy::OuterOnly).is_err());
    }

    #[test]
    fn test_validate_large_ring() {
        let n = 40_000;
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (a.cos(), a.sin())
            })
            .collect();
        let geometry = Geometry::from(Polygon::new(LineString::from(coords), vec![]));
        assert!(geometry.validate("circle", HolePolicy::OuterOnly).is_ok());
    }

    #[test]
    fn test_invalid_variant() {
        let geometry = Geometry::Invalid {
            reason: "unsupported geometry type \"Point\"".to_string(),
        };
        assert!(!geometry.is_valid());
        assert!(geometry.polygons().is_empty());
        assert!(geometry.bbox().is_none());
        let err = geometry.validate("pin", HolePolicy::OuterOnly).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidGeometry { .. }));
    }
}
