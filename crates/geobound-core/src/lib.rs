//! `geobound-core` downloads GADM administrative boundary archives and
//! converts the shapefiles inside them to `GeoJSON` and TopoJSON.
//!
//! This crate includes:
//! - **Configuration**: country codes, dataset URL templates and the
//!   [`config::PipelineConfig`] describing one run.
//! - **Stages**: archive download ([`fetch`]), extraction ([`archive`]),
//!   shapefile discovery ([`enumerate`]), simplification ([`simplify`]) and
//!   output writing ([`writer`]).
//! - **Backend Registry**: the conversion backends and their capabilities
//!   ([`backends`]), implemented in [`converters`].
//! - **Pipeline**: [`pipeline::run`] chains the stages for one country.

pub mod archive;
pub mod backends;
pub mod config;
pub mod converters;
pub mod country;
pub mod dataset;
pub mod enumerate;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod simplify;
pub mod types;
pub mod writer;
