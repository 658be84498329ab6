//! Boundary features and attribute lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Geometry;

/// Village name keys, highest priority first
pub const DEFAULT_NAME_KEYS: &[&str] = &["VILLNAME", "VILLAGE_NAME", "Name"];

/// Containing-area (town) keys, highest priority first
pub const DEFAULT_AREA_KEYS: &[&str] = &["TOWNNAME", "TOWN_NAME"];

/// Priority-ordered property keys for each semantic field.
///
/// Datasets from different publishers spell the same attribute differently,
/// so each field is resolved by trying its keys in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeKeys {
    pub name: Vec<String>,
    pub area: Vec<String>,
}

impl Default for AttributeKeys {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_KEYS.iter().map(|k| k.to_string()).collect(),
            area: DEFAULT_AREA_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// A single boundary with its properties
#[derive(Debug, Clone)]
pub struct Feature {
    /// GeoJSON `id`, if the source carried one
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Non-empty string value of a property
    pub fn text(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// First non-empty value among `keys`
    pub fn first_text<S: AsRef<str>>(&self, keys: &[S]) -> Option<&str> {
        keys.iter().find_map(|k| self.text(k.as_ref()))
    }

    /// Display name, resolved through the name keys
    pub fn name(&self, keys: &AttributeKeys) -> Option<&str> {
        self.first_text(keys.name.as_slice())
    }

    /// Containing-area name, resolved through the area keys
    pub fn area(&self, keys: &AttributeKeys) -> Option<&str> {
        self.first_text(keys.area.as_slice())
    }

    /// Label used in logs and errors when a feature has no name
    pub fn describe(&self, keys: &AttributeKeys) -> String {
        match (self.name(keys), &self.id) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => format!("#{}", id),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}

/// Ordered, read-only set of features loaded once per run
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
