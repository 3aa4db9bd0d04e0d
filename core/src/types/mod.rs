//! Core type definitions for classification and harmonization
//!
//! - [`ClassificationRecord`]: the four attributes assigned by the model
//! - [`CodeEntry`] / [`CodingScheme`]: a standardized code and the scheme it belongs to
//! - [`HarmonizerConfig`]: explicit pipeline configuration
//! - [`HarmonizeResponse`] / [`ErrorResponse`]: outbound JSON bodies

mod code;
mod config;
mod record;
mod response;

pub use code::{CodeEntry, CodingScheme, LOINC_DESIGNATOR, LOINC_VERSION};
pub use config::{HarmonizerConfig, DEFAULT_ENDPOINT, DEFAULT_JPEG_QUALITY, DEFAULT_MODEL};
pub use record::{
    ClassificationRecord, BODY_PARTS, DIRECTIONS, MODALITIES, NOT_AVAILABLE, PROTOCOLS, UNKNOWN,
};
pub use response::{ErrorResponse, HarmonizeResponse, STATUS_SUCCESS};
