use super::{ClassificationRecord, CodeEntry};
use crate::error::HarmonizerError;
use serde::Serialize;

/// Status reported by successful harmonization
pub const STATUS_SUCCESS: &str = "success";

/// Success body for a harmonization request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonizeResponse {
    pub status: &'static str,
    pub analysis: ClassificationRecord,
    pub code: CodeEntry,
}

impl HarmonizeResponse {
    pub fn new(analysis: ClassificationRecord, code: CodeEntry) -> Self {
        Self {
            status: STATUS_SUCCESS,
            analysis,
            code,
        }
    }
}

/// Failure body: `{"error": <kind>, "message": <string>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl From<&HarmonizerError> for ErrorResponse {
    fn from(err: &HarmonizerError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}
