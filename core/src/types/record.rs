use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel written to every field when the model answer cannot be used
pub const NOT_AVAILABLE: &str = "NA";

/// Value the model is told to use when it cannot decide
pub const UNKNOWN: &str = "Unknown";

/// Modalities the model may report
pub const MODALITIES: [&str; 3] = ["CT", "CR", "XRAY"];

/// Body parts the model may report
pub const BODY_PARTS: [&str; 2] = ["Head", "Chest"];

/// Contrast protocols the model may report
pub const PROTOCOLS: [&str; 2] = ["Contrast Enhanced", "Non Contrast Enhanced"];

/// Imaging planes / orientations the model may report
pub const DIRECTIONS: [&str; 4] = ["Lateral", "Sagittal", "Axial", "Coronal"];

/// The four clinical attributes the model assigns to an image
///
/// Values are kept verbatim as the model produced them so that the record
/// equals the parsed JSON object. Either all four come from the model or all
/// four hold [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Imaging technique ("CT", "CR", "XRAY", "Unknown" or "NA")
    pub modality: String,

    /// Anatomical region ("Head", "Chest", "Unknown" or "NA")
    pub body_part: String,

    /// Contrast protocol ("Contrast Enhanced", "Non Contrast Enhanced", "Unknown" or "NA")
    pub protocol: String,

    /// Imaging plane ("Lateral", "Sagittal", "Axial", "Coronal", "Unknown" or "NA")
    pub direction: String,
}

impl ClassificationRecord {
    /// Creates a new ClassificationRecord
    pub fn new(
        modality: impl Into<String>,
        body_part: impl Into<String>,
        protocol: impl Into<String>,
        direction: impl Into<String>,
    ) -> Self {
        Self {
            modality: modality.into(),
            body_part: body_part.into(),
            protocol: protocol.into(),
            direction: direction.into(),
        }
    }

    /// Record with every field set to the sentinel
    pub fn fallback() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE)
    }

    /// Returns whether this is the uniform sentinel record
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// Checks that every field holds a value from the vocabulary offered to the model
    ///
    /// A record outside the vocabulary is still valid; it will simply not map
    /// to a code.
    pub fn is_within_vocabulary(&self) -> bool {
        fn allowed(value: &str, options: &[&str]) -> bool {
            value == UNKNOWN || value == NOT_AVAILABLE || options.contains(&value)
        }

        allowed(&self.modality, &MODALITIES)
            && allowed(&self.body_part, &BODY_PARTS)
            && allowed(&self.protocol, &PROTOCOLS)
            && allowed(&self.direction, &DIRECTIONS)
    }
}

impl fmt::Display for ClassificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.body_part, self.modality, self.protocol, self.direction
        )
    }
}
