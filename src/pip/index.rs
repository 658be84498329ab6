//! Spatial index for finding which features contain a point.

use geo_types::Coord;
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, info};

use super::{geometry_contains, HolePolicy};
use crate::models::{Feature, FeatureCollection};

/// Envelope of one feature, keyed by its position in the collection
#[derive(Debug, Clone)]
pub struct IndexedFeature {
    pub index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedFeature {
    pub fn new(index: usize, feature: &Feature) -> Option<Self> {
        let rect = feature.geometry.bbox()?;
        Some(Self {
            index,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

/// In-memory R-tree over feature bounding boxes, built once per run
pub struct FeatureIndex<'a> {
    collection: &'a FeatureCollection,
    tree: RTree<IndexedFeature>,
}

impl<'a> FeatureIndex<'a> {
    pub fn build(collection: &'a FeatureCollection) -> Self {
        info!("Building spatial index for {} features...", collection.len());

        let indexed: Vec<IndexedFeature> = collection
            .iter()
            .enumerate()
            .filter_map(|(i, f)| IndexedFeature::new(i, f))
            .collect();

        let tree = RTree::bulk_load(indexed);
        debug!("Spatial index built with {} entries", tree.size());

        Self { collection, tree }
    }

    /// Indices of all features containing the point, in collection order
    pub fn locate(&self, point: Coord<f64>, policy: HolePolicy) -> Vec<usize> {
        let query_envelope = AABB::from_point([point.x, point.y]);

        // Bounding boxes narrow the candidates, ray casting decides
        let mut found: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|entry| {
                self.collection
                    .get(entry.index)
                    .is_some_and(|f| geometry_contains(point, &f.geometry, policy))
            })
            .map(|entry| entry.index)
            .collect();

        found.sort_unstable();
        found
    }

    /// First containing feature in collection order
    pub fn locate_first(&self, point: Coord<f64>, policy: HolePolicy) -> Option<&'a Feature> {
        self.locate(point, policy)
            .first()
            .and_then(|&i| self.collection.get(i))
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
