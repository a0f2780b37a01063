//! TopoJSON output for `geobound`.
//!
//! Administrative levels are decoded as `GeoJSON` feature collections; this
//! crate turns one or more of them into a single [`topojson::Topology`] where
//! each collection becomes a named `GeometryCollection` object.
//!
//! The encoder stores every line string and polygon ring as its own arc.
//! Boundaries shared between neighbouring features are not merged and
//! coordinates are not quantized, so the output is a valid but unoptimised
//! topology.

mod encoder;

pub use encoder::{TopologyEncoder, encode};
pub use topojson::{ArcIndexes, Geometry, NamedGeometry, Topology, Value};

use thiserror::Error;

/// Errors raised while serialising a topology.
#[derive(Debug, Error)]
pub enum TopoJsonError {
    /// JSON serialisation failed.
    #[error("Failed to serialise TopoJSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialises `topology` to a compact JSON string.
///
/// # Errors
///
/// Returns [`TopoJsonError::Serialize`] if serialisation fails.
pub fn to_json(topology: &Topology) -> Result<String, TopoJsonError> {
    Ok(serde_json::to_string(topology)?)
}
