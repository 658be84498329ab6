//! Core data models for boundary verification.

pub mod feature;
pub mod geometry;
pub mod report;

pub use feature::{AttributeKeys, Feature, FeatureCollection};
pub use geometry::Geometry;
pub use report::{
    LabeledPoint, MatchKind, PointVerdict, VerificationReport, VerificationRequest,
};
