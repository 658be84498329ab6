//! Point-in-polygon (PIP) containment engine.
//!
//! Ray casting on rings, lifted to polygons (with an optional hole policy)
//! and to multi-part geometries, plus an R-tree for locating the features
//! that contain a point.

mod index;
mod polygon;
mod resolver;
mod ring;

pub use index::{FeatureIndex, IndexedFeature};
pub use polygon::{polygon_contains, HolePolicy};
pub use resolver::{boundary_distance, geometry_contains};
pub use ring::{ring_contains, ring_distance};
