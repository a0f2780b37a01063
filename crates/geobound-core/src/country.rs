//! ISO 3166-1 alpha-3 country codes and the paths derived from them.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Country used when none is given on the command line.
pub const DEFAULT_COUNTRY: &str = "PAK";

/// A validated, upper-case three-letter country code.
///
/// # Examples
///
/// ```
/// use geobound_core::country::CountryCode;
///
/// let code = CountryCode::parse(" ind ").unwrap();
/// assert_eq!(code.as_str(), "IND");
/// assert_eq!(code.shapefile_dir(), "IND-SHP");
/// assert!(CountryCode::parse("INDIA").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parses a case-insensitive three-letter code, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] unless the trimmed input is
    /// exactly three ASCII letters.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidOption {
                option: "country".to_string(),
                message: format!(
                    "'{input}' is not an ISO 3166-1 alpha-3 code (expected three letters, e.g. {DEFAULT_COUNTRY})"
                ),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the downloaded archive, e.g. `PAK.zip`.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.0)
    }

    /// Directory receiving the extracted shapefiles, e.g. `PAK-SHP`.
    #[must_use]
    pub fn shapefile_dir(&self) -> String {
        format!("{}-SHP", self.0)
    }

    /// Directory receiving `GeoJSON` documents, e.g. `PAK-GeoJSON`.
    #[must_use]
    pub fn geojson_dir(&self) -> String {
        format!("{}-GeoJSON", self.0)
    }

    /// Directory receiving TopoJSON documents, e.g. `PAK-TopoJSON`.
    #[must_use]
    pub fn topojson_dir(&self) -> String {
        format!("{}-TopoJSON", self.0)
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY.to_string())
    }
}

impl FromStr for CountryCode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
