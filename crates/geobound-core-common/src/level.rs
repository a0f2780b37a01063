//! Administrative level naming derived from shapefile base names.
//!
//! GADM ships one shapefile per administrative tier and encodes the tier as the
//! last character of the file name (`PAK_adm0.shp`, `gadm36_PAK_2.shp`). That
//! character drives both the output file name and the TopoJSON object key.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while deriving an [`AdminLevel`] from a path.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The path has no usable file stem.
    #[error("Cannot derive an administrative level from '{path}': empty file name")]
    EmptyName {
        /// The offending path
        path: PathBuf,
    },
}

/// One administrative level of a country's shapefile set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLevel {
    base_name: String,
    level: char,
}

impl AdminLevel {
    /// Derives the level from a shapefile path.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::EmptyName`] when the path has no file stem.
    ///
    /// # Examples
    ///
    /// ```
    /// use geobound_core_common::AdminLevel;
    ///
    /// let level = AdminLevel::from_path("PAK-SHP/PAK_adm2.shp").unwrap();
    /// assert_eq!(level.object_key(), "adm2");
    /// assert_eq!(level.file_name(), "PAK_adm2.json");
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let base_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let level = base_name
            .chars()
            .last()
            .ok_or_else(|| LevelError::EmptyName {
                path: path.to_path_buf(),
            })?;

        Ok(Self { base_name, level })
    }

    /// The shapefile base name without extension.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The level character (usually a digit).
    #[must_use]
    pub fn level(&self) -> char {
        self.level
    }

    /// Key of the TopoJSON object holding this level, e.g. `adm1`.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("adm{}", self.level)
    }

    /// File name used for both `GeoJSON` and TopoJSON output documents.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.base_name)
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.object_key(), self.base_name)
    }
}
