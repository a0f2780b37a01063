//! Common types and traits shared across `geobound` crates.
//!
//! This crate provides the abstractions that are shared between
//! `geobound-core` and the format crates, preventing circular dependencies.

pub mod backends;
pub mod converter;
pub mod level;

// Re-export commonly used types
pub use backends::{Backend, BackendCapabilities, SupportStatus};
pub use converter::{ConversionJob, ConversionOutput, ConvertError, Converter};
pub use level::{AdminLevel, LevelError};
