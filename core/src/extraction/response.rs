//! Recovery of a [`ClassificationRecord`] from untrusted model output
//!
//! The model answer goes through an ordered chain of parse attempts. Each
//! attempt either yields a record, reports that it does not apply, or rejects
//! the answer. A rejection (or a malformed envelope) produces the uniform
//! sentinel record; no error ever leaves this module.

use crate::model::ModelResponse;
use crate::types::ClassificationRecord;
use log::{debug, warn};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

/// Keys the model must return
pub const REQUIRED_KEYS: [&str; 4] = ["modality", "body_part", "protocol", "direction"];

/// Why a model answer was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Envelope without a textual `content` field
    MissingContent,
    /// Text is not a JSON object
    InvalidJson(String),
    /// JSON object lacks one of [`REQUIRED_KEYS`]
    MissingField(&'static str),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingContent => write!(f, "invalid format: 'content' key missing"),
            RejectReason::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
            RejectReason::MissingField(key) => write!(f, "missing field '{}'", key),
        }
    }
}

/// Where the returned record came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSource {
    /// A ```` ```json ```` fenced block inside the content
    FencedBlock,
    /// The whole content parsed as JSON
    BareJson,
    /// Sentinel record substituted for an unusable answer
    Fallback(RejectReason),
}

/// Result of extraction: always a complete record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub record: ClassificationRecord,
    pub source: ExtractionSource,
}

impl Extraction {
    fn fallback(reason: RejectReason) -> Self {
        warn!("Using fallback classification: {}", reason);
        Self {
            record: ClassificationRecord::fallback(),
            source: ExtractionSource::Fallback(reason),
        }
    }

    /// Returns whether the sentinel record was substituted
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ExtractionSource::Fallback(_))
    }
}

/// Outcome of a single parse attempt
enum Attempt {
    Parsed(ClassificationRecord),
    NoMatch,
    Rejected(RejectReason),
}

type ParseStep = fn(&str) -> Attempt;

/// Parse attempts in priority order; the first non-`NoMatch` outcome wins
const PARSE_CHAIN: [(ExtractionSource, ParseStep); 2] = [
    (ExtractionSource::FencedBlock, parse_fenced_block),
    (ExtractionSource::BareJson, parse_bare_json),
];

/// Extracts a classification record from a model response
pub fn extract(response: &ModelResponse) -> Extraction {
    let content = match content_text(response) {
        Ok(text) => text,
        Err(reason) => return Extraction::fallback(reason),
    };

    for (source, step) in PARSE_CHAIN {
        match step(content) {
            Attempt::Parsed(record) => {
                debug!("Classification parsed from {:?}: {}", source, record);
                return Extraction { record, source };
            }
            Attempt::Rejected(reason) => return Extraction::fallback(reason),
            Attempt::NoMatch => continue,
        }
    }

    Extraction::fallback(RejectReason::InvalidJson("no JSON found".to_string()))
}

/// Shorthand for [`extract`] when only the record matters
pub fn extract_record(response: &ModelResponse) -> ClassificationRecord {
    extract(response).record
}

/// Text the model produced, from the envelope's `content` field or the raw string
fn content_text(response: &ModelResponse) -> std::result::Result<&str, RejectReason> {
    match response {
        ModelResponse::Text(text) => Ok(text.as_str()),
        ModelResponse::Envelope(Value::String(text)) => Ok(text.as_str()),
        ModelResponse::Envelope(envelope) => envelope
            .get("content")
            .and_then(Value::as_str)
            .ok_or(RejectReason::MissingContent),
    }
}

/// Interior of the first ```` ```json ... ``` ```` block, if any
pub fn find_fenced_block(text: &str) -> Option<&str> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"(?s)```json[ \t]*\r?\n?(.*?)```").expect("Failed to compile regex")
    });

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn parse_fenced_block(text: &str) -> Attempt {
    match find_fenced_block(text) {
        Some(block) => into_attempt(parse_record(block)),
        None => Attempt::NoMatch,
    }
}

fn parse_bare_json(text: &str) -> Attempt {
    into_attempt(parse_record(text.trim()))
}

fn into_attempt(result: std::result::Result<ClassificationRecord, RejectReason>) -> Attempt {
    match result {
        Ok(record) => Attempt::Parsed(record),
        Err(reason) => Attempt::Rejected(reason),
    }
}

/// Parses a JSON object carrying all of [`REQUIRED_KEYS`] as strings
fn parse_record(json_text: &str) -> std::result::Result<ClassificationRecord, RejectReason> {
    let value: Value =
        serde_json::from_str(json_text).map_err(|e| RejectReason::InvalidJson(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| RejectReason::InvalidJson("expected a JSON object".to_string()))?;

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !object.contains_key(**key)) {
        return Err(RejectReason::MissingField(*missing));
    }

    serde_json::from_value(value).map_err(|e| RejectReason::InvalidJson(e.to_string()))
}
