//! Feature lookup by name, optionally narrowed by containing area.

use tracing::{debug, warn};

use crate::error::VerifyError;
use crate::models::{AttributeKeys, Feature, FeatureCollection, MatchKind};

/// A feature picked out of a collection
#[derive(Debug, Clone)]
pub struct FeatureMatch<'a> {
    pub index: usize,
    pub feature: &'a Feature,
    pub kind: MatchKind,
}

/// Finds the first feature whose name contains a target substring
#[derive(Debug, Clone, Default)]
pub struct FeatureMatcher {
    keys: AttributeKeys,
}

impl FeatureMatcher {
    pub fn new(keys: AttributeKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &AttributeKeys {
        &self.keys
    }

    /// Look up a feature by name part and optional area part.
    ///
    /// The strict pass requires both to match. When an area was requested and
    /// nothing satisfies it, a name-only match is returned as
    /// [`MatchKind::Relaxed`]. Collection order decides ties.
    pub fn find<'a>(
        &self,
        collection: &'a FeatureCollection,
        target_name: &str,
        required_area: Option<&str>,
    ) -> Result<FeatureMatch<'a>, VerifyError> {
        let strict = collection
            .iter()
            .enumerate()
            .find(|(_, f)| self.name_matches(f, target_name) && self.area_matches(f, required_area));

        if let Some((index, feature)) = strict {
            debug!(
                "Matched {:?} at index {}",
                feature.describe(&self.keys),
                index
            );
            return Ok(FeatureMatch {
                index,
                feature,
                kind: MatchKind::Strict,
            });
        }

        // Without an area constraint the strict pass was already name-only
        let Some(area) = required_area else {
            return Err(VerifyError::feature_not_found(target_name, None));
        };

        let relaxed = collection
            .iter()
            .enumerate()
            .find(|(_, f)| self.name_matches(f, target_name));

        match relaxed {
            Some((index, feature)) => {
                let found_area = feature.area(&self.keys).map(str::to_string);
                warn!(
                    "Found {:?} in {:?} but not in area {:?}",
                    feature.describe(&self.keys),
                    found_area.as_deref().unwrap_or("<unknown>"),
                    area
                );
                Ok(FeatureMatch {
                    index,
                    feature,
                    kind: MatchKind::Relaxed { found_area },
                })
            }
            None => Err(VerifyError::feature_not_found(target_name, Some(area))),
        }
    }

    fn name_matches(&self, feature: &Feature, target_name: &str) -> bool {
        feature
            .name(&self.keys)
            .is_some_and(|name| name.contains(target_name))
    }

    /// Any area alias may carry the area; no constraint always matches
    fn area_matches(&self, feature: &Feature, required_area: Option<&str>) -> bool {
        match required_area {
            None => true,
            Some(area) => self
                .keys
                .area
                .iter()
                .filter_map(|key| feature.text(key))
                .any(|value| value.contains(area)),
        }
    }
}
