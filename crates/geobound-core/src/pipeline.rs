//! The download, extract, enumerate, convert and write pipeline.
//!
//! Stages run strictly in sequence and levels are converted one at a time.
//! The first failure aborts the run; files produced before it stay on disk.

use std::path::PathBuf;

use geobound_core_common::{AdminLevel, ConversionJob, Converter};
use log::{info, warn};

use crate::archive::{ArchiveError, extract_archive, remove_archive};
use crate::backends::{create_converter, find_backend};
use crate::config::PipelineConfig;
use crate::enumerate::{SHAPEFILE_PATTERN, enumerate_shapefiles};
use crate::error::{GeoBoundError, IoError, Result, backend_not_found};
use crate::fetch::ArchiveSource;
use crate::types::{LevelReport, RunSummary};
use crate::writer::OutputWriter;

/// Runs the pipeline with the converter of the configured backend.
///
/// # Errors
///
/// Returns the first error raised by any stage. See [`run_with_converter`].
pub async fn run(config: &PipelineConfig, source: &dyn ArchiveSource) -> Result<RunSummary> {
    config.validate()?;
    let backend = find_backend(&config.backend).ok_or_else(|| backend_not_found(&config.backend))?;
    let converter = create_converter(&backend)?;
    run_with_converter(config, source, converter.as_ref()).await
}

/// Runs the pipeline with an explicit converter.
///
/// 1. Downloads the archive from [`PipelineConfig::archive_url`], unless a
///    local archive is configured.
/// 2. Extracts it into `<CODE>-SHP` and deletes a downloaded archive unless
///    asked to keep it. A local archive is never deleted.
/// 3. Lists the `.shp` files, converts each and writes the documents.
///
/// # Errors
///
/// Returns [`GeoBoundError::Config`] for invalid options,
/// [`GeoBoundError::Fetch`], [`GeoBoundError::Archive`] and
/// [`GeoBoundError::Enumerate`] for the respective stages,
/// [`GeoBoundError::Convert`] if a level fails to convert and
/// [`GeoBoundError::Io`] if output cannot be written.
pub async fn run_with_converter(
    config: &PipelineConfig,
    source: &dyn ArchiveSource,
    converter: &dyn Converter,
) -> Result<RunSummary> {
    config.validate()?;
    let layout = config.layout();
    let capabilities = converter.capabilities();
    info!(
        "Processing {} with the '{}' backend",
        config.country,
        converter.name()
    );

    let (archive, archive_bytes) = match &config.local_archive {
        Some(path) => {
            if !path.is_file() {
                return Err(IoError::FileNotFound { path: path.clone() }.into());
            }
            info!("Using local archive {}", path.display());
            (path.clone(), None)
        },
        None => {
            let root = &config.output_root;
            tokio::fs::create_dir_all(root)
                .await
                .map_err(|source| IoError::CreateDir {
                    path: root.clone(),
                    source,
                })?;
            let url = config.archive_url();
            info!("Downloading {url}");
            let bytes = source.download(&url, layout.archive_path()).await?;
            info!(
                "Downloaded {bytes} bytes to {}",
                layout.archive_path().display()
            );
            (layout.archive_path().to_path_buf(), Some(bytes))
        },
    };

    let extracted = extract(archive.clone(), layout.shapefile_dir().to_path_buf()).await?;
    info!(
        "Extracted {} file(s) into {}",
        extracted.len(),
        layout.shapefile_dir().display()
    );
    if archive_bytes.is_some() && !config.keep_archive {
        remove_archive(&archive)?;
        info!("Removed {}", archive.display());
    }

    let shapefiles = enumerate_shapefiles(layout.shapefile_dir(), SHAPEFILE_PATTERN)?;
    if shapefiles.is_empty() {
        warn!(
            "No shapefiles found in {}; nothing to convert",
            layout.shapefile_dir().display()
        );
    }

    let writer = OutputWriter::prepare(&layout, capabilities.writes_topojson())?;
    let tolerance = if capabilities.honours_tolerance() {
        Some(config.tolerance)
    } else {
        info!(
            "The '{}' backend does not simplify; tolerance {} is ignored",
            converter.name(),
            config.tolerance
        );
        None
    };

    let mut levels = Vec::with_capacity(shapefiles.len());
    for shapefile in shapefiles {
        let level = AdminLevel::from_path(&shapefile)?;
        info!("Converting {level} from {}", shapefile.display());

        let job = ConversionJob {
            source: shapefile.clone(),
            level: level.clone(),
            tolerance,
        };
        let output = converter
            .convert(&job)
            .await
            .map_err(|source| GeoBoundError::Convert {
                level: level.to_string(),
                source,
            })?;
        let files = writer.write_level(&level, &output)?;

        levels.push(LevelReport {
            level,
            source: shapefile,
            feature_count: output.feature_count,
            coordinate_count: output.coordinate_count,
            files,
        });
    }

    info!("Finished {}: {} level(s) written", config.country, levels.len());
    Ok(RunSummary {
        country: config.country.clone(),
        backend: converter.name(),
        archive_bytes,
        tolerance,
        levels,
    })
}

async fn extract(archive: PathBuf, dest: PathBuf) -> Result<Vec<PathBuf>> {
    let task = tokio::task::spawn_blocking({
        let archive = archive.clone();
        move || extract_archive(&archive, &dest)
    });
    let extracted = task
        .await
        .map_err(|e| extract_task_error(archive, &e))??;
    Ok(extracted)
}

fn extract_task_error(archive: PathBuf, err: &tokio::task::JoinError) -> GeoBoundError {
    GeoBoundError::Archive(ArchiveError::Open {
        path: archive,
        message: format!("extraction task failed: {err}"),
    })
}
