//! Data types describing the result of a run.

use std::path::PathBuf;

use geobound_core_common::AdminLevel;

use crate::country::CountryCode;

/// Files written for one administrative level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    /// Path of the `GeoJSON` document
    pub geojson: PathBuf,
    /// Path of the TopoJSON document, if one was written
    pub topojson: Option<PathBuf>,
}

/// Outcome of converting one shapefile.
#[derive(Debug, Clone)]
pub struct LevelReport {
    /// Administrative level
    pub level: AdminLevel,
    /// Source shapefile
    pub source: PathBuf,
    /// Features written
    pub feature_count: usize,
    /// Coordinate positions written to the `GeoJSON` document
    pub coordinate_count: usize,
    /// Output files
    pub files: WrittenFiles,
}

/// Outcome of a whole run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Country processed
    pub country: CountryCode,
    /// Backend used
    pub backend: &'static str,
    /// Bytes downloaded, or `None` when a local archive was used
    pub archive_bytes: Option<u64>,
    /// Tolerance applied, or `None` when the backend does not simplify
    pub tolerance: Option<f64>,
    /// One report per converted level, in enumeration order
    pub levels: Vec<LevelReport>,
}

impl RunSummary {
    /// Total features across all levels.
    #[must_use]
    pub fn total_features(&self) -> usize {
        self.levels.iter().map(|l| l.feature_count).sum()
    }
}
