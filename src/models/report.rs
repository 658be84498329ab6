//! Verification requests and results.

use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// A caller-supplied point with the label it is reported under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub label: String,
    pub lng: f64,
    pub lat: f64,
}

impl LabeledPoint {
    pub fn new(label: &str, lng: f64, lat: f64) -> Self {
        Self {
            label: label.to_string(),
            lng,
            lat,
        }
    }

    /// Planar coordinate (x = longitude, y = latitude)
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

/// What to look up and which points to check against it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Substring of the feature name
    pub target_name: String,

    /// Substring of the containing-area name, used to disambiguate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_area: Option<String>,

    /// Points in report order
    #[serde(default)]
    pub points: Vec<LabeledPoint>,
}

impl VerificationRequest {
    pub fn new(target_name: &str) -> Self {
        Self {
            target_name: target_name.to_string(),
            required_area: None,
            points: Vec::new(),
        }
    }

    pub fn in_area(mut self, area: &str) -> Self {
        self.required_area = Some(area.to_string());
        self
    }

    pub fn point(mut self, label: &str, lng: f64, lat: f64) -> Self {
        self.points.push(LabeledPoint::new(label, lng, lat));
        self
    }
}

/// How the feature was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// Name and (if requested) area both matched
    Strict,
    /// Only the name matched; the area constraint was not satisfied
    Relaxed {
        #[serde(skip_serializing_if = "Option::is_none")]
        found_area: Option<String>,
    },
}

impl MatchKind {
    pub fn is_relaxed(&self) -> bool {
        matches!(self, MatchKind::Relaxed { .. })
    }
}

/// Result for a single point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointVerdict {
    pub label: String,
    pub lng: f64,
    pub lat: f64,
    pub contained: bool,

    /// Planar distance to the nearest boundary segment, only set when outside
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_boundary: Option<f64>,
}

/// Result for a whole run against one feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Position of the matched feature in the collection
    pub feature_index: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_area: Option<String>,

    #[serde(rename = "match")]
    pub match_kind: MatchKind,

    pub verdicts: Vec<PointVerdict>,

    /// AND over all verdicts
    pub all_contained: bool,
}

impl VerificationReport {
    /// Verdicts for points that fell outside the boundary
    pub fn failures(&self) -> impl Iterator<Item = &PointVerdict> {
        self.verdicts.iter().filter(|v| !v.contained)
    }

    pub fn verdict(&self, label: &str) -> Option<&PointVerdict> {
        self.verdicts.iter().find(|v| v.label == label)
    }
}
