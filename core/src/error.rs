use thiserror::Error;

/// Result type for harmonizer operations
pub type Result<T> = std::result::Result<T, HarmonizerError>;

/// Error types for harmonizer operations
///
/// A malformed model answer is not represented here: the response extractor
/// recovers from it locally with the sentinel record.
#[derive(Error, Debug)]
pub enum HarmonizerError {
    /// Input bytes did not decode to a DICOM object with usable pixel data
    #[error("DICOM decode error: {0}")]
    Decode(String),

    /// Inference backend unreachable, timed out or answered with an error status
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Classification has no row in the code table
    #[error("No code for body_part={body_part}, modality={modality}, qualifier={qualifier}")]
    MappingFailure {
        body_part: String,
        modality: String,
        qualifier: String,
    },

    /// Serialization of the modified object failed
    #[error("DICOM write error: {0}")]
    Write(String),

    /// Invalid configuration or code table extension
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarmonizerError {
    /// Stable machine-readable kind, used as the `error` field of failure responses
    pub fn kind(&self) -> &'static str {
        match self {
            HarmonizerError::Decode(_) => "decode_error",
            HarmonizerError::ModelUnavailable(_) => "model_unavailable",
            HarmonizerError::MappingFailure { .. } => "mapping_failure",
            HarmonizerError::Write(_) => "write_error",
            HarmonizerError::Config(_) => "config_error",
            HarmonizerError::Io(_) => "io_error",
        }
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for HarmonizerError {
    fn from(e: dicom_object::ReadError) -> Self {
        HarmonizerError::Decode(format!("{}", e))
    }
}

impl From<dicom_object::WriteError> for HarmonizerError {
    fn from(e: dicom_object::WriteError) -> Self {
        HarmonizerError::Write(format!("{}", e))
    }
}

impl From<dicom_pixeldata::Error> for HarmonizerError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        HarmonizerError::Decode(format!("{}", e))
    }
}

// JPEG encoding is the last normalizer step: an image that cannot be
// encoded is reported as unusable input, like any other pixel data failure.
impl From<image::ImageError> for HarmonizerError {
    fn from(e: image::ImageError) -> Self {
        HarmonizerError::Decode(format!("normalized image could not be JPEG encoded: {}", e))
    }
}

impl From<reqwest::Error> for HarmonizerError {
    fn from(e: reqwest::Error) -> Self {
        HarmonizerError::ModelUnavailable(format!("{}", e))
    }
}
