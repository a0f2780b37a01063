//! Display utilities for formatting CLI output.
//!
//! This module provides table row structures and formatting functions
//! for presenting backends and run results in a human-readable format.

use std::path::Path;

use tabled::{Table, Tabled};

use geobound_core::backends::Backend;
use geobound_core::types::{LevelReport, RunSummary};

/// Table row representation for displaying backend information.
#[derive(Tabled)]
pub struct BackendRow {
    /// Short identifier used with `--backend`.
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the backend.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Support status for writing `GeoJSON`.
    #[tabled(rename = "GeoJSON")]
    pub geojson: String,
    /// Support status for writing TopoJSON.
    #[tabled(rename = "TopoJSON")]
    pub topojson: String,
    /// Support status for simplification.
    #[tabled(rename = "Simplify")]
    pub simplify: String,
}

impl From<&Backend> for BackendRow {
    fn from(backend: &Backend) -> Self {
        Self {
            short_name: backend.short_name.to_string(),
            long_name: backend.long_name.to_string(),
            geojson: backend.capabilities.geojson.as_str().to_string(),
            topojson: backend.capabilities.topojson.as_str().to_string(),
            simplify: backend.capabilities.simplify.as_str().to_string(),
        }
    }
}

/// Table row representation for one converted administrative level.
#[derive(Tabled)]
pub struct LevelRow {
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Features")]
    pub features: usize,
    #[tabled(rename = "Coordinates")]
    pub coordinates: usize,
    /// Written files, one per line.
    #[tabled(rename = "Output")]
    pub output: String,
}

impl From<&LevelReport> for LevelRow {
    fn from(report: &LevelReport) -> Self {
        let mut output = report.files.geojson.display().to_string();
        if let Some(topojson) = &report.files.topojson {
            output.push('\n');
            output.push_str(&topojson.display().to_string());
        }
        Self {
            level: report.level.object_key(),
            source: file_name(&report.source),
            features: report.feature_count,
            coordinates: report.coordinate_count,
            output,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Display all backends in a formatted table.
pub fn display_backends(backends: &[Backend]) {
    println!("\nAvailable Backends ({} total):\n", backends.len());

    let rows: Vec<BackendRow> = backends.iter().map(BackendRow::from).collect();
    let table = Table::new(rows).to_string();
    println!("{table}");
}

/// Display the outcome of a run.
///
/// Prints the country, backend and download size, followed by one table row
/// per converted level.
pub fn display_summary(summary: &RunSummary) {
    println!("\nCountry: {}", summary.country);
    println!("Backend: {}", summary.backend);
    match summary.archive_bytes {
        Some(bytes) => println!("Downloaded: {bytes} bytes"),
        None => println!("Downloaded: local archive"),
    }
    match summary.tolerance {
        Some(tolerance) => println!("Tolerance: {tolerance}"),
        None => println!("Tolerance: not applied"),
    }

    if summary.levels.is_empty() {
        println!("\nNo shapefiles were converted.");
        return;
    }

    println!("\n=== Levels ===");
    let rows: Vec<LevelRow> = summary.levels.iter().map(LevelRow::from).collect();
    let table = Table::new(rows).to_string();
    println!("{table}");
    println!(
        "\n{} feature(s) in {} level(s)",
        summary.total_features(),
        summary.levels.len()
    );
}
