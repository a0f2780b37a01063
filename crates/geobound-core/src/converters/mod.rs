//! Conversion backends.
//!
//! [`NativeConverter`] decodes, simplifies and encodes in-process.
//! [`ExternalConverter`] shells out to the `shapefile` and `topojson-server`
//! command line tools and optionally stops after `GeoJSON`.

mod external;
mod native;

pub use external::ExternalConverter;
pub use native::NativeConverter;
