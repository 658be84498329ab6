//! Perimeter - checks that coordinates fall inside a named boundary
//!
//! This library provides the containment engine, feature lookup and
//! verification driver used by the `verify` binary.

pub mod error;
pub mod geojson;
pub mod matcher;
pub mod models;
pub mod pip;
pub mod verifier;

pub use error::VerifyError;
pub use matcher::{FeatureMatch, FeatureMatcher};
pub use models::{
    AttributeKeys, Feature, FeatureCollection, Geometry, LabeledPoint, MatchKind, PointVerdict,
    VerificationReport, VerificationRequest,
};
pub use pip::{FeatureIndex, HolePolicy};
pub use verifier::{verify, Verifier};
