//! Backend registry.
//!
//! This module provides a static registry of conversion backends and their
//! capabilities, and builds the [`Converter`] for a chosen backend.
//!
//! # Examples
//!
//! ```
//! use geobound_core::backends::{find_backend, get_backend_names};
//!
//! let native = find_backend("NATIVE").expect("native backend should exist");
//! assert!(native.capabilities.honours_tolerance());
//!
//! assert_eq!(get_backend_names(), ["external", "external-geojson", "native"]);
//! ```

use geobound_core_common::Converter;

pub use geobound_core_common::{Backend, BackendCapabilities, SupportStatus};

use crate::converters::{ExternalConverter, NativeConverter};
use crate::error::{BackendError, backend_not_found};

/// Returns every registered backend.
///
/// - `native` decodes shapefiles in-process, simplifies, and writes both
///   `GeoJSON` and TopoJSON.
/// - `external` runs `shp2json` and `geo2topo`.
/// - `external-geojson` runs `shp2json` only.
#[must_use]
pub fn get_backends() -> Vec<Backend> {
    use SupportStatus::{NotSupported, Supported};

    vec![
        Backend::new(
            "native",
            "In-process shapefile decoding with simplification",
            Supported,
            Supported,
            Supported,
        ),
        Backend::new(
            "external",
            "External shp2json + geo2topo tools",
            Supported,
            Supported,
            NotSupported,
        ),
        Backend::new(
            "external-geojson",
            "External shp2json tool, GeoJSON only",
            Supported,
            NotSupported,
            NotSupported,
        ),
    ]
}

/// Finds a backend by its short name (case-insensitive).
#[must_use]
pub fn find_backend(name: &str) -> Option<Backend> {
    get_backends()
        .into_iter()
        .find(|b| b.short_name.eq_ignore_ascii_case(name.trim()))
}

/// Returns all backend short names in alphabetically sorted order.
#[must_use]
pub fn get_backend_names() -> Vec<&'static str> {
    let mut names: Vec<_> = get_backends().iter().map(|b| b.short_name).collect();
    names.sort_unstable();
    names
}

/// Builds the converter implementing `backend`.
///
/// # Errors
///
/// Returns [`BackendError::NotFound`] if no converter is registered under the
/// backend's short name.
pub fn create_converter(backend: &Backend) -> Result<Box<dyn Converter>, BackendError> {
    match backend.short_name {
        "native" => Ok(Box::new(NativeConverter::new())),
        "external" => Ok(Box::new(ExternalConverter::new())),
        "external-geojson" => Ok(Box::new(ExternalConverter::geojson_only())),
        other => Err(backend_not_found(other)),
    }
}
