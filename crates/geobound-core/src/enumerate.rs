//! Shapefile discovery inside an extraction directory.

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Pattern matching the geometry file of every shapefile set.
pub const SHAPEFILE_PATTERN: &str = "*.shp";

/// Errors raised while listing shapefiles.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// The directory to search does not exist.
    #[error("Shapefile directory '{path}' does not exist")]
    MissingDirectory {
        /// The directory path
        path: PathBuf,
    },

    /// The glob pattern is malformed.
    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Description of the problem
        message: String,
    },

    /// A directory entry could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// The unreadable path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Lists files directly inside `dir` whose names match `pattern`.
///
/// Special characters in `dir` itself are escaped, so only `pattern` is
/// interpreted as a glob. Results are sorted, which for GADM archives yields
/// the administrative levels in ascending order. An empty result is not an
/// error.
///
/// # Errors
///
/// Returns [`EnumerateError::MissingDirectory`] if `dir` is not a directory,
/// [`EnumerateError::Pattern`] for a malformed pattern and
/// [`EnumerateError::Read`] if an entry cannot be read.
pub fn enumerate_shapefiles(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, EnumerateError> {
    if !dir.is_dir() {
        return Err(EnumerateError::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let full_pattern = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let paths = glob::glob(&full_pattern).map_err(|e| EnumerateError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            EnumerateError::Read {
                path,
                source: e.into(),
            }
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();

    debug!(
        "Found {} file(s) matching '{pattern}' in {}",
        matches.len(),
        dir.display()
    );
    Ok(matches)
}
