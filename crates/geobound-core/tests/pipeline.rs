//! End-to-end runs of the pipeline against a mocked GADM server.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use geobound_core::config::PipelineConfig;
use geobound_core::country::CountryCode;
use geobound_core::dataset::UrlTemplate;
use geobound_core::error::GeoBoundError;
use geobound_core::fetch::HttpArchiveSource;
use geobound_core::pipeline::run;
use geobound_core::types::RunSummary;
use geobound_shapefile::count_records;
use geobound_shapefile::test_support::{ShapefileFixture, jagged_square, square};
use geojson::GeoJson;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::FileOptions;

/// Zips a three-level shapefile set for `code` the way GADM 2.8 ships it.
fn gadm_archive(code: &str) -> Vec<u8> {
    let staging = TempDir::new().unwrap();
    ShapefileFixture::new(format!("{code}_adm0"))
        .with_polygon("Country", jagged_square(60.0, 20.0, 10.0, 40))
        .write_to(staging.path())
        .unwrap();
    ShapefileFixture::new(format!("{code}_adm1"))
        .with_polygon("North", jagged_square(60.0, 25.0, 5.0, 20))
        .with_polygon("South", jagged_square(60.0, 20.0, 5.0, 20))
        .write_to(staging.path())
        .unwrap();
    ShapefileFixture::new(format!("{code}_adm2"))
        .with_polygon("A", square(60.0, 20.0, 1.0))
        .with_polygon("B", square(61.0, 20.0, 1.0))
        .with_polygon("C", square(62.0, 20.0, 1.0))
        .write_to(staging.path())
        .unwrap();

    let mut names: Vec<_> = fs::read_dir(staging.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for name in names {
        zip.start_file(name.as_str(), FileOptions::default()).unwrap();
        zip.write_all(&fs::read(staging.path().join(&name)).unwrap())
            .unwrap();
    }
    zip.finish().unwrap().into_inner()
}

async fn serve(server: &MockServer, code: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/gadm/{code}_adm_shp.zip")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gadm_archive(code)))
        .mount(server)
        .await;
}

fn config(server: &MockServer, root: &Path) -> PipelineConfig {
    let template = UrlTemplate::new(format!("{}/gadm/{{code}}_adm_shp.zip", server.uri())).unwrap();
    PipelineConfig::default()
        .with_url_template(template)
        .with_output_root(root)
}

async fn run_native(config: &PipelineConfig) -> RunSummary {
    let source = HttpArchiveSource::new(Duration::from_secs(5)).unwrap();
    run(config, &source).await.unwrap()
}

fn feature_count(path: &Path) -> usize {
    match fs::read_to_string(path).unwrap().parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc.features.len(),
        other => panic!("expected a FeatureCollection in {}, got {other:?}", path.display()),
    }
}

#[tokio::test]
async fn test_default_country_end_to_end() {
    let server = MockServer::start().await;
    serve(&server, "PAK").await;
    let root = TempDir::new().unwrap();
    let config = config(&server, root.path());

    let summary = run_native(&config).await;

    assert_eq!(summary.country, CountryCode::default());
    assert_eq!(summary.backend, "native");
    assert_eq!(summary.levels.len(), 3);
    assert_eq!(summary.total_features(), 6);
    assert!(!root.path().join("PAK.zip").exists());
    for dir in ["PAK-SHP", "PAK-GeoJSON", "PAK-TopoJSON"] {
        assert!(root.path().join(dir).is_dir(), "{dir} missing");
    }
}

#[tokio::test]
async fn test_geojson_feature_count_matches_shapefile() {
    let server = MockServer::start().await;
    serve(&server, "NPL").await;
    let root = TempDir::new().unwrap();
    let config = config(&server, root.path()).with_country(CountryCode::parse("npl").unwrap());

    let summary = run_native(&config).await;

    for level in &summary.levels {
        let expected = count_records(&level.source).unwrap();
        assert_eq!(feature_count(&level.files.geojson), expected, "{}", level.level);
        assert_eq!(level.feature_count, expected);
    }
}

#[tokio::test]
async fn test_topojson_has_one_object_per_level() {
    let server = MockServer::start().await;
    serve(&server, "PAK").await;
    let root = TempDir::new().unwrap();

    let summary = run_native(&config(&server, root.path())).await;

    for level in &summary.levels {
        let path = level.files.topojson.as_ref().unwrap();
        let topology: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let keys: Vec<_> = topology["objects"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, [format!("adm{}", level.level.level())]);
    }
}

#[tokio::test]
async fn test_rerun_overwrites_outputs() {
    let server = MockServer::start().await;
    serve(&server, "PAK").await;
    let root = TempDir::new().unwrap();
    let config = config(&server, root.path());

    run_native(&config).await;
    let geojson_dir = root.path().join("PAK-GeoJSON");
    let first: Vec<_> = fs::read_dir(&geojson_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    let adm1 = geojson_dir.join("PAK_adm1.json");
    let before = fs::read_to_string(&adm1).unwrap();

    run_native(&config).await;
    let second: Vec<_> = fs::read_dir(&geojson_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), first.len());
    assert_eq!(fs::read_to_string(&adm1).unwrap(), before);
    assert_eq!(fs::read_dir(root.path().join("PAK-TopoJSON")).unwrap().count(), 3);
}

#[tokio::test]
async fn test_larger_tolerance_never_adds_points() {
    let server = MockServer::start().await;
    serve(&server, "PAK").await;

    let mut previous: Option<usize> = None;
    for tolerance in [0.0, 0.01, 0.05, 0.5] {
        let root = TempDir::new().unwrap();
        let config = config(&server, root.path()).with_tolerance(tolerance);
        let summary = run_native(&config).await;
        let total: usize = summary.levels.iter().map(|l| l.coordinate_count).sum();
        if let Some(previous) = previous {
            assert!(total <= previous, "tolerance {tolerance}: {total} > {previous}");
        }
        previous = Some(total);
    }
    // Every zig-zag collapses at the coarsest tolerance: six squares of five points.
    assert_eq!(previous, Some(30));
}

#[tokio::test]
async fn test_unknown_country_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let root = TempDir::new().unwrap();
    let config = config(&server, root.path()).with_country(CountryCode::parse("xxx").unwrap());
    let source = HttpArchiveSource::new(Duration::from_secs(5)).unwrap();

    let err = run(&config, &source).await.unwrap_err();
    assert!(matches!(err, GeoBoundError::Fetch(_)));
    assert!(err.recovery_suggestion().is_some());
    assert!(!root.path().join("XXX-GeoJSON").exists());
}
