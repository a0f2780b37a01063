use std::path::Path;

use async_trait::async_trait;
use geobound_core_common::{
    BackendCapabilities, ConversionJob, ConversionOutput, ConvertError, Converter, SupportStatus,
};
use geobound_shapefile::read_feature_collection;
use log::debug;

use crate::simplify::{coordinate_count, simplify_collection};

/// In-process converter: shapefile decoding, RDP simplification, `GeoJSON`
/// and TopoJSON encoding all happen inside this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeConverter;

impl NativeConverter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Converter for NativeConverter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            geojson: SupportStatus::Supported,
            topojson: SupportStatus::Supported,
            simplify: SupportStatus::Supported,
        }
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionOutput, ConvertError> {
        let job = job.clone();
        let source = job.source.clone();
        tokio::task::spawn_blocking(move || convert_blocking(&job))
            .await
            .map_err(|e| ConvertError::Transform {
                path: source,
                message: format!("conversion task failed: {e}"),
            })?
    }
}

fn convert_blocking(job: &ConversionJob) -> Result<ConversionOutput, ConvertError> {
    let path = job.source.as_path();
    let mut collection = read_feature_collection(path).map_err(|e| ConvertError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let coordinate_count = match job.tolerance {
        Some(tolerance) => {
            let before = coordinate_count(&collection);
            let after = simplify_collection(&mut collection, tolerance).map_err(|e| {
                ConvertError::Transform {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            debug!("Simplified {}: {before} -> {after} positions", job.level);
            after
        },
        None => coordinate_count(&collection),
    };

    let geojson = serde_json::to_string(&collection).map_err(|e| encode_error("GeoJSON", path, &e))?;
    let object_key = job.level.object_key();
    let topology = geobound_topojson::encode([(object_key.as_str(), &collection)]);
    let topojson =
        geobound_topojson::to_json(&topology).map_err(|e| encode_error("TopoJSON", path, &e))?;

    Ok(ConversionOutput {
        geojson,
        topojson: Some(topojson),
        feature_count: collection.features.len(),
        coordinate_count,
    })
}

fn encode_error(format: &str, path: &Path, err: &dyn std::error::Error) -> ConvertError {
    ConvertError::Encode {
        format: format.to_string(),
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geobound_core_common::AdminLevel;
    use geobound_shapefile::test_support::{ShapefileFixture, jagged_square, square};
    use geojson::GeoJson;
    use tempfile::TempDir;

    fn job(path: &Path, tolerance: Option<f64>) -> ConversionJob {
        ConversionJob {
            source: path.to_path_buf(),
            level: AdminLevel::from_path(path).unwrap(),
            tolerance,
        }
    }

    #[tokio::test]
    async fn test_convert_produces_both_documents() {
        let temp_dir = TempDir::new().unwrap();
        let path = ShapefileFixture::new("PAK_adm1")
            .with_polygon("Punjab", square(70.0, 30.0, 1.0))
            .with_polygon("Sindh", square(67.0, 25.0, 2.0))
            .write_to(temp_dir.path())
            .unwrap();

        let output = NativeConverter::new()
            .convert(&job(&path, None))
            .await
            .unwrap();

        assert_eq!(output.feature_count, 2);
        assert_eq!(output.coordinate_count, 10);
        let GeoJson::FeatureCollection(fc) = output.geojson.parse::<GeoJson>().unwrap() else {
            panic!("expected a FeatureCollection");
        };
        assert_eq!(fc.features.len(), 2);

        let topology: serde_json::Value =
            serde_json::from_str(output.topojson.as_deref().unwrap()).unwrap();
        let objects = topology["objects"].as_object().unwrap();
        assert_eq!(objects.keys().collect::<Vec<_>>(), ["adm1"]);
        assert_eq!(objects["adm1"]["geometries"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tolerance_reduces_coordinates() {
        let temp_dir = TempDir::new().unwrap();
        let path = ShapefileFixture::new("PAK_adm2")
            .with_polygon("Lahore", jagged_square(74.0, 31.0, 1.0, 20))
            .write_to(temp_dir.path())
            .unwrap();
        let converter = NativeConverter::new();

        let raw = converter.convert(&job(&path, Some(0.0))).await.unwrap();
        let fine = converter.convert(&job(&path, Some(0.001))).await.unwrap();
        let coarse = converter.convert(&job(&path, Some(0.1))).await.unwrap();

        assert_eq!(raw.coordinate_count, 81);
        assert!(fine.coordinate_count <= raw.coordinate_count);
        assert!(coarse.coordinate_count <= fine.coordinate_count);
        assert_eq!(coarse.coordinate_count, 5);
        assert_eq!(coarse.feature_count, 1);
    }

    #[tokio::test]
    async fn test_missing_shapefile_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("PAK_adm0.shp");
        let err = NativeConverter::new()
            .convert(&job(&path, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
    }
}
