//! In-process shapefile decoding for `geobound`.
//!
//! Shapefiles are streamed through `geozero`'s shapefile reader into a
//! `GeoJSON` writer and parsed back into a [`geojson::FeatureCollection`], so
//! downstream code only ever deals with `GeoJSON` types.

mod reader;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use reader::{ShapefileError, count_records, read_feature_collection};
