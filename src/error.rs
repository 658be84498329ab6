//! Domain errors produced by the verification core.
//!
//! IO and parse failures are not part of this taxonomy; they travel as
//! `anyhow::Error` from the GeoJSON loader and the binary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerifyError {
    /// No feature name contains the target (with or without area constraint)
    #[error("no feature matching {name:?}{}", area_suffix(.area))]
    FeatureNotFound { name: String, area: Option<String> },

    /// Geometry cannot be used for containment checks
    #[error("invalid geometry for feature {feature:?}: {reason}")]
    InvalidGeometry { feature: String, reason: String },
}

impl VerifyError {
    pub fn feature_not_found(name: &str, area: Option<&str>) -> Self {
        VerifyError::FeatureNotFound {
            name: name.to_string(),
            area: area.map(str::to_string),
        }
    }

    pub fn invalid_geometry(feature: &str, reason: impl Into<String>) -> Self {
        VerifyError::InvalidGeometry {
            feature: feature.to_string(),
            reason: reason.into(),
        }
    }
}

fn area_suffix(area: &Option<String>) -> String {
    match area {
        Some(area) => format!(" in area {:?}", area),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_mentions_area() {
        let err = VerifyError::feature_not_found("Foo", Some("East"));
        assert_eq!(err.to_string(), "no feature matching \"Foo\" in area \"East\"");
    }

    #[test]
    fn test_not_found_message_without_area() {
        let err = VerifyError::feature_not_found("Foo", None);
        assert_eq!(err.to_string(), "no feature matching \"Foo\"");
    }
}
