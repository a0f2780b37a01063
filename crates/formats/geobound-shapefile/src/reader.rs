//! Shapefile to `GeoJSON` decoding.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use geojson::{FeatureCollection, GeoJson};
use geozero::ProcessorSink;
use geozero::geojson::GeoJsonWriter;
use geozero::shp::ShpReader;
use log::debug;
use thiserror::Error;

/// Errors raised while decoding a shapefile.
#[derive(Debug, Error)]
pub enum ShapefileError {
    /// The `.shp` file (or one of its siblings) could not be opened.
    #[error("Failed to open shapefile '{path}': {message}")]
    Open {
        /// The shapefile path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// A record could not be decoded.
    #[error("Failed to decode record {record} of '{path}': {message}")]
    Decode {
        /// The shapefile path
        path: PathBuf,
        /// Zero-based index of the failing record
        record: usize,
        /// Description of the failure
        message: String,
    },

    /// The intermediate `GeoJSON` could not be parsed back.
    #[error("Decoded shapefile '{path}' is not a valid FeatureCollection: {message}")]
    Parse {
        /// The shapefile path
        path: PathBuf,
        /// Description of the failure
        message: String,
    },
}

/// Reads a shapefile and its attribute table into a `GeoJSON` `FeatureCollection`.
///
/// The `.dbf` file must sit next to the `.shp` file; each shape is paired with
/// its attribute record and the attributes become feature properties.
///
/// # Errors
///
/// Returns [`ShapefileError::Open`] if the files cannot be opened,
/// [`ShapefileError::Decode`] if a record is malformed and
/// [`ShapefileError::Parse`] if the decoded output is not a `FeatureCollection`.
pub fn read_feature_collection(path: impl AsRef<Path>) -> Result<FeatureCollection, ShapefileError> {
    let path = path.as_ref();
    debug!("Decoding shapefile {}", path.display());

    let reader = ShpReader::from_path(path).map_err(|e| open_error(path, &e))?;

    let mut json: Vec<u8> = Vec::new();
    {
        let mut writer = GeoJsonWriter::new(&mut json);
        let features = reader
            .iter_features(&mut writer)
            .map_err(|e| open_error(path, &e))?;
        for (record, feature) in features.enumerate() {
            feature.map_err(|e| ShapefileError::Decode {
                path: path.to_path_buf(),
                record,
                message: error_chain(&e),
            })?;
        }
    }

    match GeoJson::from_reader(json.as_slice()) {
        Ok(GeoJson::FeatureCollection(collection)) => {
            debug!(
                "Decoded {} feature(s) from {}",
                collection.features.len(),
                path.display()
            );
            Ok(collection)
        },
        Ok(other) => Err(ShapefileError::Parse {
            path: path.to_path_buf(),
            message: format!("expected a FeatureCollection, found {}", geojson_kind(&other)),
        }),
        Err(e) => Err(ShapefileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

/// Counts the shape records in a `.shp` file without decoding attributes.
///
/// # Errors
///
/// Returns [`ShapefileError::Open`] if the file cannot be opened and
/// [`ShapefileError::Decode`] if a record is malformed.
pub fn count_records(path: impl AsRef<Path>) -> Result<usize, ShapefileError> {
    let path = path.as_ref();
    let reader = ShpReader::from_path(path).map_err(|e| open_error(path, &e))?;
    let mut sink = ProcessorSink::new();
    let mut count = 0;
    for (record, shape) in reader.iter_geometries(&mut sink).enumerate() {
        shape.map_err(|e| ShapefileError::Decode {
            path: path.to_path_buf(),
            record,
            message: error_chain(&e),
        })?;
        count += 1;
    }
    Ok(count)
}

fn open_error(path: &Path, err: &geozero::shp::Error) -> ShapefileError {
    ShapefileError::Open {
        path: path.to_path_buf(),
        message: error_chain(err),
    }
}

/// geozero's shapefile errors hide the underlying cause in `source()`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn geojson_kind(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "a Geometry",
        GeoJson::Feature(_) => "a Feature",
        GeoJson::FeatureCollection(_) => "a FeatureCollection",
    }
}
