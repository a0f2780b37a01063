//! Conversion backend descriptors and their capabilities.
//!
//! A backend is one way of turning a shapefile into output documents: shelling
//! out to external tools, or decoding and encoding in-process. Each backend
//! advertises which outputs it can produce and whether it honours a
//! simplification tolerance.

/// Support status for a specific backend capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The capability is fully supported and implemented.
    Supported,
    /// The capability is not supported by the backend.
    NotSupported,
}

impl SupportStatus {
    /// Returns `true` if the capability is fully supported and implemented.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported)
    }

    /// Returns the string representation of this support status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SupportStatus::Supported => "Supported",
            SupportStatus::NotSupported => "Not Supported",
        }
    }
}

/// Capabilities of a conversion backend.
///
/// Every backend must at least produce `GeoJSON`; TopoJSON output and
/// simplification vary between backends.
#[derive(Debug, Clone, Copy)]
pub struct BackendCapabilities {
    /// Support status for writing `GeoJSON` documents.
    pub geojson: SupportStatus,
    /// Support status for writing TopoJSON documents.
    pub topojson: SupportStatus,
    /// Support status for applying a simplification tolerance.
    pub simplify: SupportStatus,
}

impl BackendCapabilities {
    /// Returns `true` if the backend produces TopoJSON alongside `GeoJSON`.
    #[must_use]
    pub fn writes_topojson(&self) -> bool {
        self.topojson.is_supported()
    }

    /// Returns `true` if a tolerance passed to this backend has any effect.
    #[must_use]
    pub fn honours_tolerance(&self) -> bool {
        self.simplify.is_supported()
    }
}

/// Conversion backend definition.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Short name used on the command line (e.g., `"native"`).
    pub short_name: &'static str,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// Capabilities advertised by this backend.
    pub capabilities: BackendCapabilities,
}

impl Backend {
    /// Creates a new backend definition with specified capabilities.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        geojson: SupportStatus,
        topojson: SupportStatus,
        simplify: SupportStatus,
    ) -> Self {
        Self {
            short_name,
            long_name,
            capabilities: BackendCapabilities {
                geojson,
                topojson,
                simplify,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_status() {
        assert!(SupportStatus::Supported.is_supported());
        assert!(!SupportStatus::NotSupported.is_supported());
        assert_eq!(SupportStatus::Supported.as_str(), "Supported");
        assert_eq!(SupportStatus::NotSupported.as_str(), "Not Supported");
    }

    #[test]
    fn test_capabilities_helpers() {
        let backend = Backend::new(
            "native",
            "In-process",
            SupportStatus::Supported,
            SupportStatus::Supported,
            SupportStatus::Supported,
        );
        assert!(backend.capabilities.writes_topojson());
        assert!(backend.capabilities.honours_tolerance());

        let geojson_only = Backend::new(
            "external-geojson",
            "shp2json",
            SupportStatus::Supported,
            SupportStatus::NotSupported,
            SupportStatus::NotSupported,
        );
        assert!(!geojson_only.capabilities.writes_topojson());
        assert!(!geojson_only.capabilities.honours_tolerance());
    }
}
