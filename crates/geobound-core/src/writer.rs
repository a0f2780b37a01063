//! Output directory preparation and document writing.

use std::fs;
use std::path::{Path, PathBuf};

use geobound_core_common::{AdminLevel, ConversionOutput};
use log::{debug, warn};

use crate::config::OutputLayout;
use crate::error::IoError;
use crate::types::WrittenFiles;

/// Writes per-level documents into the country's output directories.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    geojson_dir: PathBuf,
    topojson_dir: Option<PathBuf>,
}

impl OutputWriter {
    /// Creates the `GeoJSON` directory and, when `topojson` is set, the
    /// TopoJSON directory. Existing directories are reused.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CreateDir`] if a directory cannot be created.
    pub fn prepare(layout: &OutputLayout, topojson: bool) -> Result<Self, IoError> {
        create_dir(layout.geojson_dir())?;
        let topojson_dir = if topojson {
            create_dir(layout.topojson_dir())?;
            Some(layout.topojson_dir().to_path_buf())
        } else {
            None
        };
        Ok(Self {
            geojson_dir: layout.geojson_dir().to_path_buf(),
            topojson_dir,
        })
    }

    /// Writes the documents for `level`, replacing files from earlier runs.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Write`] if a file cannot be written.
    pub fn write_level(
        &self,
        level: &AdminLevel,
        output: &ConversionOutput,
    ) -> Result<WrittenFiles, IoError> {
        let file_name = level.file_name();

        let geojson = self.geojson_dir.join(&file_name);
        write_file("GeoJSON", &geojson, &output.geojson)?;

        let topojson = match (&self.topojson_dir, &output.topojson) {
            (Some(dir), Some(document)) => {
                let path = dir.join(&file_name);
                write_file("TopoJSON", &path, document)?;
                Some(path)
            },
            (Some(_), None) => {
                warn!("No TopoJSON produced for {level}");
                None
            },
            (None, _) => None,
        };

        Ok(WrittenFiles { geojson, topojson })
    }
}

fn create_dir(path: &Path) -> Result<(), IoError> {
    fs::create_dir_all(path).map_err(|source| IoError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(format: &str, path: &Path, contents: &str) -> Result<(), IoError> {
    debug!("Writing {format} file {}", path.display());
    fs::write(path, contents).map_err(|source| IoError::Write {
        format: format.to_string(),
        path: path.to_path_buf(),
        source,
    })
}
