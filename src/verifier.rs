//! Verification driver: find the feature, check every point against it.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::VerifyError;
use crate::matcher::{FeatureMatch, FeatureMatcher};
use crate::models::{
    AttributeKeys, FeatureCollection, Geometry, LabeledPoint, PointVerdict, VerificationReport,
    VerificationRequest,
};
use crate::pip::{boundary_distance, geometry_contains, HolePolicy};

/// Checks labelled points against a named boundary
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    matcher: FeatureMatcher,
    policy: HolePolicy,
}

impl Verifier {
    /// Verifier resolving names through `keys` and testing rings per `policy`
    pub fn new(keys: AttributeKeys, policy: HolePolicy) -> Self {
        Self {
            matcher: FeatureMatcher::new(keys),
            policy,
        }
    }

    pub fn with_hole_policy(mut self, policy: HolePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn matcher(&self) -> &FeatureMatcher {
        &self.matcher
    }

    pub fn policy(&self) -> HolePolicy {
        self.policy
    }

    /// Verify every point in request order.
    ///
    /// Lookup or geometry failures abort the run; no partial report is produced.
    pub fn verify(
        &self,
        collection: &FeatureCollection,
        request: &VerificationRequest,
    ) -> Result<VerificationReport, VerifyError> {
        let found = self.resolve(collection, request)?;
        let verdicts = request
            .points
            .iter()
            .map(|p| self.check_point(&found.feature.geometry, p))
            .collect();
        Ok(self.report(found, verdicts))
    }

    /// Same as [`Verifier::verify`], checking points on the rayon pool.
    ///
    /// Verdict order still follows the request.
    pub fn verify_par(
        &self,
        collection: &FeatureCollection,
        request: &VerificationRequest,
    ) -> Result<VerificationReport, VerifyError> {
        let found = self.resolve(collection, request)?;
        let verdicts = request
            .points
            .par_iter()
            .map(|p| self.check_point(&found.feature.geometry, p))
            .collect();
        Ok(self.report(found, verdicts))
    }

    fn resolve<'a>(
        &self,
        collection: &'a FeatureCollection,
        request: &VerificationRequest,
    ) -> Result<FeatureMatch<'a>, VerifyError> {
        let found = self.matcher.find(
            collection,
            &request.target_name,
            request.required_area.as_deref(),
        )?;

        found
            .feature
            .geometry
            .validate(&found.feature.describe(self.matcher.keys()), self.policy)?;

        info!(
            "Checking {} points against {:?} ({} parts)",
            request.points.len(),
            found.feature.describe(self.matcher.keys()),
            found.feature.geometry.polygons().len()
        );

        Ok(found)
    }

    fn check_point(&self, geometry: &Geometry, point: &LabeledPoint) -> PointVerdict {
        let coord = point.coord();
        let contained = geometry_contains(coord, geometry, self.policy);
        let distance_to_boundary = if contained {
            None
        } else {
            Some(boundary_distance(coord, geometry))
        };

        debug!(
            "{} ({}, {}): contained={}",
            point.label, point.lng, point.lat, contained
        );

        PointVerdict {
            label: point.label.clone(),
            lng: point.lng,
            lat: point.lat,
            contained,
            distance_to_boundary,
        }
    }

    fn report(&self, found: FeatureMatch<'_>, verdicts: Vec<PointVerdict>) -> VerificationReport {
        let keys = self.matcher.keys();
        let all_contained = verdicts.iter().all(|v| v.contained);

        VerificationReport {
            feature_index: found.index,
            feature_name: found.feature.name(keys).map(str::to_string),
            feature_area: found.feature.area(keys).map(str::to_string),
            match_kind: found.kind,
            verdicts,
            all_contained,
        }
    }
}

/// Verify with default attribute keys and outer-ring-only containment
pub fn verify(
    collection: &FeatureCollection,
    request: &VerificationRequest,
) -> Result<VerificationReport, VerifyError> {
    Verifier::default().verify(collection, request)
}
