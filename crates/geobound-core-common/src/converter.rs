//! Converter trait implemented by every conversion backend.
//!
//! A converter turns one shapefile into a `GeoJSON` document and, when the
//! backend supports it, a TopoJSON document. Converters are driven one file at a
//! time by the pipeline and never write to the output directories themselves.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::backends::BackendCapabilities;
use crate::level::AdminLevel;

/// A single shapefile to convert.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Path to the `.shp` file; sibling `.dbf`/`.shx` files are expected next to it.
    pub source: PathBuf,
    /// Administrative level derived from the file name.
    pub level: AdminLevel,
    /// Simplification tolerance in coordinate units, if any.
    pub tolerance: Option<f64>,
}

/// Documents produced for one administrative level.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Serialized `GeoJSON` `FeatureCollection`.
    pub geojson: String,
    /// Serialized TopoJSON topology, for backends that produce one.
    pub topojson: Option<String>,
    /// Number of features in the `GeoJSON` document.
    pub feature_count: usize,
    /// Number of coordinate positions in the `GeoJSON` document.
    pub coordinate_count: usize,
}

/// Errors raised while converting a shapefile.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The shapefile could not be read or decoded.
    #[error("Failed to read shapefile '{path}': {message}")]
    Read {
        /// The shapefile path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// A geometry could not be transformed (e.g. simplified).
    #[error("Failed to transform geometry in '{path}': {message}")]
    Transform {
        /// The shapefile path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// An output document could not be produced.
    #[error("Failed to encode {format} for '{path}': {message}")]
    Encode {
        /// The output format (`GeoJSON` or TopoJSON)
        format: String,
        /// The shapefile path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// An external tool ran but reported failure.
    #[error("External tool '{tool}' failed{}: {stderr}", status.map(|s| format!(" with exit code {s}")).unwrap_or_default())]
    Tool {
        /// The tool name
        tool: String,
        /// Process exit code, if the process exited normally
        status: Option<i32>,
        /// Captured standard error output
        stderr: String,
    },

    /// An external tool could not be located or started.
    #[error("External tool '{tool}' could not be started: {message}")]
    ToolMissing {
        /// The tool name
        tool: String,
        /// Description of the failure
        message: String,
    },
}

/// Trait for turning one shapefile into output documents.
///
/// Implementations either shell out to external executables or decode the
/// shapefile in-process; callers select one through the backend registry.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short name of the backend this converter implements.
    fn name(&self) -> &'static str;

    /// Capabilities of this converter.
    fn capabilities(&self) -> BackendCapabilities;

    /// Converts a single shapefile.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] if the shapefile cannot be read, a geometry
    /// cannot be transformed, or an external tool fails.
    async fn convert(&self, job: &ConversionJob) -> Result<ConversionOutput, ConvertError>;
}
