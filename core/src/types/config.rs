use super::CodingScheme;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";

/// Local Ollama endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// JPEG quality for the image sent to the model
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Configuration for a harmonization pipeline
///
/// Passed explicitly to [`crate::Harmonizer`]; nothing is read from globals.
///
/// # Example
///
/// ```
/// use harmonizer_core::HarmonizerConfig;
///
/// let config = HarmonizerConfig::default()
///     .with_model("llava:7b")
///     .with_timeout_secs(Some(60));
///
/// assert_eq!(config.model, "llava:7b");
/// assert_eq!(config.timeout().unwrap().as_secs(), 60);
/// assert_eq!(config.coding_scheme.designator, "LN");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonizerConfig {
    /// Model identifier passed to the inference backend
    pub model: String,

    /// Base URL of the inference backend
    pub endpoint: String,

    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,

    /// JPEG quality (1-100) of the normalized image
    pub jpeg_quality: u8,

    /// Coding scheme written with every code
    pub coding_scheme: CodingScheme,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            coding_scheme: CodingScheme::loinc(),
        }
    }
}

impl HarmonizerConfig {
    /// Builder: Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder: Set the inference endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder: Set the request timeout
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Builder: Set the JPEG quality, clamped to 1-100
    ///
    /// # Example
    ///
    /// ```
    /// use harmonizer_core::HarmonizerConfig;
    ///
    /// let config = HarmonizerConfig::default().with_jpeg_quality(0);
    /// assert_eq!(config.jpeg_quality, 1);
    /// ```
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarmonizerConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout().is_none());
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.coding_scheme, CodingScheme::loinc());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HarmonizerConfig =
            serde_json::from_str(r#"{"model": "llava:13b", "timeout_secs": 30}"#).unwrap();
        assert_eq!(config.model, "llava:13b");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.coding_scheme.version, "2.77");
    }
}
