//! Run configuration and the output directory layout derived from it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backends::find_backend;
use crate::country::CountryCode;
use crate::dataset::UrlTemplate;
use crate::error::{ConfigError, Result, backend_not_found};

/// Simplification tolerance used when none is given.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Backend used when none is given.
pub const DEFAULT_BACKEND: &str = "native";

/// Connect timeout applied to the archive download.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a single pipeline run needs to know.
///
/// # Examples
///
/// ```
/// use geobound_core::config::PipelineConfig;
/// use geobound_core::country::CountryCode;
///
/// let config = PipelineConfig::default()
///     .with_country(CountryCode::parse("npl").unwrap())
///     .with_tolerance(0.05);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.layout().geojson_dir().file_name().unwrap(), "NPL-GeoJSON");
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Country whose boundaries are processed.
    pub country: CountryCode,
    /// Simplification tolerance in coordinate units; `0` disables simplification.
    pub tolerance: f64,
    /// Short name of the conversion backend.
    pub backend: String,
    /// Archive URL template.
    pub url_template: UrlTemplate,
    /// Directory under which every output directory is created.
    pub output_root: PathBuf,
    /// Keep the downloaded archive after extraction.
    pub keep_archive: bool,
    /// Use this local archive instead of downloading one.
    pub local_archive: Option<PathBuf>,
    /// Connect timeout for the download.
    pub connect_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            country: CountryCode::default(),
            tolerance: DEFAULT_TOLERANCE,
            backend: DEFAULT_BACKEND.to_string(),
            url_template: UrlTemplate::default(),
            output_root: PathBuf::from("."),
            keep_archive: false,
            local_archive: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_country(mut self, country: CountryCode) -> Self {
        self.country = country;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    #[must_use]
    pub fn with_url_template(mut self, url_template: UrlTemplate) -> Self {
        self.url_template = url_template;
        self
    }

    #[must_use]
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    #[must_use]
    pub fn with_keep_archive(mut self, keep_archive: bool) -> Self {
        self.keep_archive = keep_archive;
        self
    }

    #[must_use]
    pub fn with_local_archive(mut self, archive: impl Into<PathBuf>) -> Self {
        self.local_archive = Some(archive.into());
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Archive download URL for the configured country.
    #[must_use]
    pub fn archive_url(&self) -> String {
        self.url_template.url_for(&self.country)
    }

    /// Output layout rooted at [`PipelineConfig::output_root`].
    #[must_use]
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_root, &self.country)
    }

    /// Checks option values that the types alone cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a negative or non-finite tolerance,
    /// and a backend error for an unknown backend name.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidOption {
                option: "tolerance".to_string(),
                message: format!("{} is not a finite number >= 0", self.tolerance),
            }
            .into());
        }
        if find_backend(&self.backend).is_none() {
            return Err(backend_not_found(&self.backend).into());
        }
        Ok(())
    }
}

/// Paths of every artifact a run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    archive_path: PathBuf,
    shapefile_dir: PathBuf,
    geojson_dir: PathBuf,
    topojson_dir: PathBuf,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: &Path, country: &CountryCode) -> Self {
        Self {
            archive_path: root.join(country.archive_file_name()),
            shapefile_dir: root.join(country.shapefile_dir()),
            geojson_dir: root.join(country.geojson_dir()),
            topojson_dir: root.join(country.topojson_dir()),
        }
    }

    /// Where the downloaded archive is stored, e.g. `./PAK.zip`.
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    #[must_use]
    pub fn shapefile_dir(&self) -> &Path {
        &self.shapefile_dir
    }

    #[must_use]
    pub fn geojson_dir(&self) -> &Path {
        &self.geojson_dir
    }

    #[must_use]
    pub fn topojson_dir(&self) -> &Path {
        &self.topojson_dir
    }
}
