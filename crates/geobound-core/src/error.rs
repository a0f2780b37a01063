//! Custom error types for `geobound` runs.
//!
//! Each pipeline stage has its own `thiserror` enum, defined next to the stage
//! that raises it. [`GeoBoundError`] rolls them up so that callers can render a
//! user-facing message and a recovery hint for any failure.

use std::path::PathBuf;

use geobound_core_common::{ConvertError, LevelError};
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::enumerate::EnumerateError;
use crate::fetch::FetchError;

/// Main error type for `geobound` runs.
///
/// Stage errors are wrapped transparently so their own messages are shown.
#[derive(Debug, Error)]
pub enum GeoBoundError {
    /// Backend lookup errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Download errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Extraction errors
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Shapefile enumeration errors
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    /// A shapefile name does not identify an administrative level
    #[error(transparent)]
    Level(#[from] LevelError),

    /// A single administrative level failed to convert
    #[error("Failed to convert {level}: {source}")]
    Convert {
        /// The level being converted, e.g. `adm1 (PAK_adm1)`
        level: String,
        /// The underlying conversion error
        #[source]
        source: ConvertError,
    },

    /// Output I/O errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Backend registry errors.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend was not found in the registry
    #[error("Backend '{name}' not found. Available backends: {available}")]
    NotFound {
        /// The requested backend name
        name: String,
        /// Comma-separated list of available backends
        available: String,
    },
}

/// Output I/O errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to create an output directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The directory path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// The format being written
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// A local archive given on the command line does not exist
    #[error("File not found: '{path}'")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },
}

/// Type alias for Results using `GeoBoundError`.
pub type Result<T> = std::result::Result<T, GeoBoundError>;

impl GeoBoundError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Fetch(e) => format!("Download failed: {e}"),
            Self::Archive(e) => format!("Extraction failed: {e}"),
            Self::Enumerate(e) => e.to_string(),
            Self::Level(e) => e.to_string(),
            Self::Convert { level, source } => format!("Conversion of {level} failed: {source}"),
            Self::Io(e) => e.to_string(),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Backend(BackendError::NotFound { .. }) => {
                Some("Run 'geobound backends' to see all available backends.".to_string())
            },
            Self::Fetch(FetchError::Http { status: 404, .. }) => Some(
                "Check the country code and dataset; the archive does not exist upstream."
                    .to_string(),
            ),
            Self::Fetch(FetchError::Network { .. }) => {
                Some("Check your network connection and try again.".to_string())
            },
            Self::Archive(ArchiveError::Open { .. }) => Some(
                "The download may be truncated or not a zip file; delete it and retry.".to_string(),
            ),
            Self::Convert {
                source: ConvertError::ToolMissing { .. },
                ..
            } => Some(
                "Install the tools with 'npm install -g shapefile topojson-server' or use '--backend native'."
                    .to_string(),
            ),
            Self::Io(IoError::FileNotFound { .. }) => {
                Some("Check that the file path is correct and the file exists.".to_string())
            },
            _ => None,
        }
    }
}

impl BackendError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { name, available } => {
                format!(
                    "Backend '{name}' not found.\n\nAvailable backends:\n{}",
                    available
                        .split(", ")
                        .map(|d| format!("  - {d}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
        }
    }
}

/// Helper to create `BackendError::NotFound` with available backends.
#[must_use]
pub fn backend_not_found(name: &str) -> BackendError {
    use crate::backends::get_backend_names;

    let available = get_backend_names().join(", ");
    BackendError::NotFound {
        name: name.to_string(),
        available,
    }
}
