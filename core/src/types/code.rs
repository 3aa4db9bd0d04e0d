use serde::{Deserialize, Serialize};
use std::fmt;

/// Coding scheme designator for LOINC
pub const LOINC_DESIGNATOR: &str = "LN";

/// LOINC release the code table is drawn from
pub const LOINC_VERSION: &str = "2.77";

/// A standardized code with its human-readable meaning
///
/// Always non-empty: entries only come out of the code table, which rejects
/// empty values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    pub meaning: String,
}

impl CodeEntry {
    /// Creates a new CodeEntry
    pub fn new(code: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            meaning: meaning.into(),
        }
    }
}

impl fmt::Display for CodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.meaning)
    }
}

/// Coding scheme written next to the code value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingScheme {
    pub designator: String,
    pub version: String,
}

impl CodingScheme {
    /// LOINC 2.77, the scheme all built-in codes belong to
    pub fn loinc() -> Self {
        Self {
            designator: LOINC_DESIGNATOR.to_string(),
            version: LOINC_VERSION.to_string(),
        }
    }
}

impl Default for CodingScheme {
    fn default() -> Self {
        Self::loinc()
    }
}

impl fmt::Display for CodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.designator, self.version)
    }
}
