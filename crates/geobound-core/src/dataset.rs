//! Upstream GADM dataset versions and download URL templates.

use std::fmt;
use std::str::FromStr;

use crate::country::CountryCode;
use crate::error::ConfigError;

/// Placeholder replaced by the country code in a URL template.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// A published GADM release with a known archive location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dataset {
    /// GADM 2.8, one `<CODE>_adm<N>.shp` per level.
    #[default]
    Gadm28,
    /// GADM 3.6, one `gadm36_<CODE>_<N>.shp` per level.
    Gadm36,
    /// GADM 4.1, one `gadm41_<CODE>_<N>.shp` per level.
    Gadm41,
}

impl Dataset {
    /// Every known dataset, oldest first.
    pub const ALL: [Dataset; 3] = [Dataset::Gadm28, Dataset::Gadm36, Dataset::Gadm41];

    /// Name used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Gadm28 => "gadm28",
            Dataset::Gadm36 => "gadm36",
            Dataset::Gadm41 => "gadm41",
        }
    }

    /// Archive URL template for this release.
    #[must_use]
    pub fn url_template(&self) -> UrlTemplate {
        let template = match self {
            Dataset::Gadm28 => "http://biogeo.ucdavis.edu/data/gadm2.8/shp/{code}_adm_shp.zip",
            Dataset::Gadm36 => "https://biogeo.ucdavis.edu/data/gadm3.6/shp/gadm36_{code}_shp.zip",
            Dataset::Gadm41 => {
                "https://geodata.ucdavis.edu/gadm/gadm4.1/shp/gadm41_{code}_shp.zip"
            },
        };
        UrlTemplate(template.to_string())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidOption {
                option: "dataset".to_string(),
                message: format!(
                    "unknown dataset '{s}' (expected one of: {})",
                    Dataset::ALL.map(|d| d.as_str()).join(", ")
                ),
            })
    }
}

/// A download URL containing a `{code}` placeholder.
///
/// # Examples
///
/// ```
/// use geobound_core::country::CountryCode;
/// use geobound_core::dataset::UrlTemplate;
///
/// let template = UrlTemplate::new("https://mirror.example/{code}.zip").unwrap();
/// let code = CountryCode::parse("npl").unwrap();
/// assert_eq!(template.url_for(&code), "https://mirror.example/NPL.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Wraps a custom template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the template has no `{code}`
    /// placeholder.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains(CODE_PLACEHOLDER) {
            return Err(ConfigError::InvalidOption {
                option: "url-template".to_string(),
                message: format!("'{template}' does not contain the {CODE_PLACEHOLDER} placeholder"),
            });
        }
        Ok(Self(template))
    }

    /// Substitutes the country code into the template.
    #[must_use]
    pub fn url_for(&self, code: &CountryCode) -> String {
        self.0.replace(CODE_PLACEHOLDER, code.as_str())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Dataset::default().url_template()
    }
}

impl From<Dataset> for UrlTemplate {
    fn from(dataset: Dataset) -> Self {
        dataset.url_template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dataset_url() {
        let code = CountryCode::default();
        assert_eq!(
            UrlTemplate::default().url_for(&code),
            "http://biogeo.ucdavis.edu/data/gadm2.8/shp/PAK_adm_shp.zip"
        );
    }

    #[test]
    fn test_newer_dataset_urls() {
        let code = CountryCode::parse("ind").unwrap();
        assert_eq!(
            Dataset::Gadm36.url_template().url_for(&code),
            "https://biogeo.ucdavis.edu/data/gadm3.6/shp/gadm36_IND_shp.zip"
        );
        assert_eq!(
            Dataset::Gadm41.url_template().url_for(&code),
            "https://geodata.ucdavis.edu/gadm/gadm4.1/shp/gadm41_IND_shp.zip"
        );
    }

    #[test]
    fn test_parse_dataset() {
        assert_eq!("GADM36".parse::<Dataset>().unwrap(), Dataset::Gadm36);
        let err = "gadm99".parse::<Dataset>().unwrap_err();
        assert!(err.to_string().contains("gadm28, gadm36, gadm41"));
    }

    #[test]
    fn test_template_requires_placeholder() {
        assert!(UrlTemplate::new("https://mirror.example/PAK.zip").is_err());
        assert!(UrlTemplate::new("https://mirror.example/{code}/{code}.zip").is_ok());
    }
}
