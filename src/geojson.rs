//! GeoJSON decoding into the verification model.
//!
//! This is where the string `type` tag of external data is turned into the
//! [`Geometry`] variant; nothing past this point inspects type strings.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::VerifyError;
use crate::models::{AttributeKeys, Feature, FeatureCollection, Geometry};
use crate::pip::HolePolicy;

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geo_type: String,
    #[serde(default)]
    coordinates: Value,
}

type RawPolygon = Vec<Vec<Vec<f64>>>;

/// Parse a GeoJSON FeatureCollection.
///
/// Features whose geometry is not a Polygon / MultiPolygon, or whose exterior
/// rings are degenerate, stay in the collection at their position with
/// [`Geometry::Invalid`], so a lookup that lands on them fails instead of
/// falling through to a later feature. With `strict` set the first such
/// feature fails the whole parse instead.
pub fn parse_feature_collection(text: &str, strict: bool) -> Result<FeatureCollection> {
    let raw: RawCollection =
        serde_json::from_str(text).context("Failed to parse GeoJSON FeatureCollection")?;
    let keys = AttributeKeys::default();

    let mut features = Vec::with_capacity(raw.features.len());
    let mut invalid = 0usize;

    for (i, raw_feature) in raw.features.into_iter().enumerate() {
        let id = raw_feature.id.as_ref().map(id_to_string);
        let properties = raw_feature.properties.unwrap_or_default();
        let label = feature_label(&properties, &keys, i);

        let decoded = raw_feature
            .geometry
            .ok_or_else(|| VerifyError::invalid_geometry(&label, "missing geometry"))
            .and_then(|g| decode_geometry(&label, g))
            .and_then(|g| g.validate(&label, HolePolicy::OuterOnly).map(|_| g));

        let geometry = match decoded {
            Ok(geometry) => geometry,
            Err(e) if strict => return Err(e.into()),
            Err(e) => {
                warn!("Unusable geometry: {}", e);
                invalid += 1;
                Geometry::Invalid {
                    reason: match e {
                        VerifyError::InvalidGeometry { reason, .. } => reason,
                        other => other.to_string(),
                    },
                }
            }
        };

        features.push(Feature {
            id,
            geometry,
            properties,
        });
    }

    info!(
        "Loaded {} features ({} with unusable geometry)",
        features.len(),
        invalid
    );
    Ok(FeatureCollection::new(features))
}

/// Read and parse a GeoJSON file; `.gz` files are decompressed on the fly
pub fn load_feature_collection(path: &Path, strict: bool) -> Result<FeatureCollection> {
    info!("Loading features from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;
    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    parse_feature_collection(&text, strict)
        .with_context(|| format!("Invalid dataset: {}", path.display()))
}

/// Name (when present) and position, for log lines and errors
fn feature_label(properties: &Map<String, Value>, keys: &AttributeKeys, index: usize) -> String {
    let name = keys
        .name
        .iter()
        .find_map(|k| properties.get(k).and_then(Value::as_str).filter(|s| !s.is_empty()));
    match name {
        Some(name) => format!("{} (feature {})", name, index),
        None => format!("feature {}", index),
    }
}

fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_geometry(label: &str, raw: RawGeometry) -> Result<Geometry, VerifyError> {
    match raw.geo_type.as_str() {
        "Polygon" => {
            let rings: RawPolygon = serde_json::from_value(raw.coordinates)
                .map_err(|e| VerifyError::invalid_geometry(label, e.to_string()))?;
            Ok(Geometry::Single(decode_polygon(label, rings)?))
        }
        "MultiPolygon" => {
            let parts: Vec<RawPolygon> = serde_json::from_value(raw.coordinates)
                .map_err(|e| VerifyError::invalid_geometry(label, e.to_string()))?;
            let polygons = parts
                .into_iter()
                .map(|rings| decode_polygon(label, rings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::Multi(MultiPolygon::new(polygons)))
        }
        other => Err(VerifyError::invalid_geometry(
            label,
            format!("unsupported geometry type {:?}", other),
        )),
    }
}

fn decode_polygon(label: &str, rings: RawPolygon) -> Result<Polygon<f64>, VerifyError> {
    let mut rings = rings
        .into_iter()
        .map(|ring| decode_ring(label, ring))
        .collect::<Result<Vec<_>, _>>()?;

    if rings.is_empty() {
        return Err(VerifyError::invalid_geometry(label, "polygon has no rings"));
    }

    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

fn decode_ring(label: &str, positions: Vec<Vec<f64>>) -> Result<LineString<f64>, VerifyError> {
    positions
        .into_iter()
        .map(|pos| match pos.as_slice() {
            // Altitude and other extra members are ignored
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(VerifyError::invalid_geometry(
                label,
                "position has fewer than two coordinates",
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerificationRequest;
    use crate::pip::FeatureIndex;
    use crate::verifier::Verifier;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const VILLAGES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 1,
                "properties": { "VILLNAME": "北崙里", "TOWNNAME": "竹北市" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "VILLAGE_NAME": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0, 12.5], [1, 0, 12.5], [1, 1, 12.5], [0, 0, 12.5]]],
                        [
                            [[5, 5], [9, 5], [9, 9], [5, 9], [5, 5]],
                            [[6, 6], [7, 6], [7, 7], [6, 6]]
                        ]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_polygon_and_multipolygon() {
        let features = parse_feature_collection(VILLAGES, true).unwrap();
        assert_eq!(features.len(), 2);

        let first = features.get(0).unwrap();
        assert_eq!(first.id.as_deref(), Some("1"));
        assert!(matches!(first.geometry, Geometry::Single(_)));

        let second = features.get(1).unwrap();
        let parts = second.geometry.polygons();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].interiors().len(), 1);
    }

    #[test]
    fn test_unsupported_type_kept_in_place() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"VILLNAME": "Road"},
             "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}},
            {"type": "Feature", "properties": {"VILLNAME": "Field"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}}
        ]}"#;
        let features = parse_feature_collection(text, false).unwrap();
        assert_eq!(features.len(), 2);
        assert!(!features.get(0).unwrap().geometry.is_valid());
        let field = features.get(1).unwrap();
        assert!(field.geometry.is_valid());
        assert_eq!(field.name(&AttributeKeys::default()), Some("Field"));
    }

    #[test]
    fn test_strict_rejects_unsupported_type() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [0, 0]}}
        ]}"#;
        let err = parse_feature_collection(text, true).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VerifyError>(),
            Some(VerifyError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_strict_rejects_degenerate_ring() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"VILLNAME": "Thin"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 1], [0, 0]]]}}
        ]}"#;
        assert!(parse_feature_collection(text, true).is_err());

        let features = parse_feature_collection(text, false).unwrap();
        assert_eq!(features.len(), 1);
        assert!(!features.get(0).unwrap().geometry.is_valid());
    }

    #[test]
    fn test_missing_geometry_kept_as_invalid() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"VILLNAME": "Ghost"}, "geometry": null}
        ]}"#;
        let features = parse_feature_collection(text, false).unwrap();
        assert_eq!(
            features.get(0).unwrap().geometry,
            Geometry::Invalid {
                reason: "missing geometry".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_first_match_is_not_skipped() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"VILLNAME": "North Village", "TOWNNAME": "Central"},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "properties": {"VILLNAME": "North Village", "TOWNNAME": "East"},
             "geometry": {"type": "Polygon", "coordinates": [[[5, 5], [6, 5], [6, 6], [5, 6], [5, 5]]]}}
        ]}"#;
        let features = parse_feature_collection(text, false).unwrap();
        let request = VerificationRequest::new("North Village")
            .in_area("Central")
            .point("exclave", 5.5, 5.5);
        let err = crate::verify(&features, &request).unwrap_err();
        assert!(matches!(err, VerifyError::InvalidGeometry { .. }));

        // The broken feature is not indexed; the valid one still is
        let index = FeatureIndex::build(&features);
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.locate(Coord { x: 5.5, y: 5.5 }, HolePolicy::OuterOnly),
            vec![1]
        );
    }

    #[test]
    fn test_degenerate_hole_loads_outer_only() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"VILLNAME": "Holey"},
             "geometry": {"type": "Polygon", "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[4, 4], [4, 4], [4, 4]]
             ]}}
        ]}"#;
        let features = parse_feature_collection(text, true).unwrap();
        assert!(features.get(0).unwrap().geometry.is_valid());

        let request = VerificationRequest::new("Holey").point("corner", 1.0, 1.0);
        assert!(crate::verify(&features, &request).unwrap().all_contained);

        let err = Verifier::default()
            .with_hole_policy(HolePolicy::SubtractHoles)
            .verify(&features, &request)
            .unwrap_err();
        assert!(matches!(err, VerifyError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_malformed_json_is_not_a_domain_error() {
        let err = parse_feature_collection("{not json", false).unwrap_err();
        assert!(err.downcast_ref::<VerifyError>().is_none());
    }

    #[test]
    fn test_load_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("villages.json");
        std::fs::write(&plain, VILLAGES).unwrap();
        assert_eq!(load_feature_collection(&plain, true).unwrap().len(), 2);

        let gz = dir.path().join("villages.json.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(VILLAGES.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(load_feature_collection(&gz, true).unwrap().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_feature_collection(&dir.path().join("nope.json"), false).is_err());
    }
}
