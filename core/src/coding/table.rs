use crate::error::{HarmonizerError, Result};
use crate::types::{ClassificationRecord, CodeEntry};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Read;

/// Third key component of a code rule
///
/// CT rows are told apart by contrast protocol, X-ray rows by direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Protocol must equal the value
    Protocol(Cow<'static, str>),
    /// Direction must equal the value
    Direction(Cow<'static, str>),
    /// Any direction, including "Unknown" and "NA"
    AnyDirection,
}

impl Qualifier {
    /// Checks if the record satisfies this qualifier
    pub fn matches(&self, record: &ClassificationRecord) -> bool {
        match self {
            Qualifier::Protocol(p) => record.protocol == *p,
            Qualifier::Direction(d) => record.direction == *d,
            Qualifier::AnyDirection => true,
        }
    }
}

/// One row of the code table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeRule {
    pub body_part: Cow<'static, str>,
    pub modality: Cow<'static, str>,
    pub qualifier: Qualifier,
    pub code: Cow<'static, str>,
    pub meaning: Cow<'static, str>,
}

impl CodeRule {
    /// Checks if the record falls under this row
    pub fn matches(&self, record: &ClassificationRecord) -> bool {
        record.body_part == self.body_part
            && record.modality == self.modality
            && self.qualifier.matches(record)
    }

    /// The (code, meaning) pair this row yields
    pub fn entry(&self) -> CodeEntry {
        CodeEntry::new(self.code.as_ref(), self.meaning.as_ref())
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("body_part", &self.body_part),
            ("modality", &self.modality),
            ("code", &self.code),
            ("meaning", &self.meaning),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(HarmonizerError::Config(format!(
                "code rule has empty {}",
                name
            ))),
            None => Ok(()),
        }
    }
}

const fn rule(
    body_part: &'static str,
    modality: &'static str,
    qualifier: Qualifier,
    code: &'static str,
    meaning: &'static str,
) -> CodeRule {
    CodeRule {
        body_part: Cow::Borrowed(body_part),
        modality: Cow::Borrowed(modality),
        qualifier,
        code: Cow::Borrowed(code),
        meaning: Cow::Borrowed(meaning),
    }
}

/// Built-in LOINC rows, in lookup order
///
/// The AP/PA row must stay after the lateral row: it catches every other
/// chest X-ray direction.
pub const LOINC_RULES: [CodeRule; 6] = [
    rule(
        "Head",
        "CT",
        Qualifier::Protocol(Cow::Borrowed("Contrast Enhanced")),
        "24727-0",
        "Head CT - with contrast",
    ),
    rule(
        "Head",
        "CT",
        Qualifier::Protocol(Cow::Borrowed("Non Contrast Enhanced")),
        "30799-1",
        "Head CT - without contrast",
    ),
    rule(
        "Chest",
        "CT",
        Qualifier::Protocol(Cow::Borrowed("Contrast Enhanced")),
        "24628-0",
        "Chest CT - with contrast",
    ),
    rule(
        "Chest",
        "CT",
        Qualifier::Protocol(Cow::Borrowed("Non Contrast Enhanced")),
        "29252-4",
        "Chest CT - without contrast",
    ),
    rule(
        "Chest",
        "XRAY",
        Qualifier::Direction(Cow::Borrowed("Lateral")),
        "39051-8",
        "Chest X-ray - LAT",
    ),
    rule(
        "Chest",
        "XRAY",
        Qualifier::AnyDirection,
        "36572-6",
        "Chest X-ray - AP/PA",
    ),
];

/// Append-only lookup table from classification to code
///
/// Lookup walks the rows in order and returns the first match, so appended
/// rows never shadow the built-in ones.
///
/// # Example
///
/// ```
/// use harmonizer_core::{ClassificationRecord, CodeTable};
///
/// let table = CodeTable::loinc();
/// let record = ClassificationRecord::new("CT", "Head", "Contrast Enhanced", "Axial");
/// let entry = table.lookup(&record).unwrap();
///
/// assert_eq!(entry.code, "24727-0");
/// assert_eq!(entry.meaning, "Head CT - with contrast");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable {
    rules: Vec<CodeRule>,
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::loinc()
    }
}

impl CodeTable {
    /// Table holding the built-in LOINC rows
    pub fn loinc() -> Self {
        Self {
            rules: LOINC_RULES.to_vec(),
        }
    }

    pub fn rules(&self) -> &[CodeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends a row after all existing rows
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any key or value is empty
    pub fn push(&mut self, rule: CodeRule) -> Result<()> {
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    /// Appends rows read from a JSON array of rules
    ///
    /// Either every row is appended or none is. Returns the number of rows added.
    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<usize> {
        let rules: Vec<CodeRule> = serde_json::from_reader(reader)
            .map_err(|e| HarmonizerError::Config(format!("invalid code table: {}", e)))?;

        for rule in &rules {
            rule.validate()?;
        }
        let added = rules.len();
        self.rules.extend(rules);
        debug!("Appended {} code rule(s), table now has {}", added, self.len());
        Ok(added)
    }

    /// Maps a classification to its code
    ///
    /// # Errors
    ///
    /// Returns [`HarmonizerError::MappingFailure`] when no row matches. There
    /// is no default code.
    pub fn lookup(&self, record: &ClassificationRecord) -> Result<CodeEntry> {
        match self.rules.iter().find(|rule| rule.matches(record)) {
            Some(rule) => Ok(rule.entry()),
            None => {
                error!("Failed to determine code for {}", record);
                Err(HarmonizerError::MappingFailure {
                    body_part: record.body_part.clone(),
                    modality: record.modality.clone(),
                    qualifier: format!(
                        "protocol={}, direction={}",
                        record.protocol, record.direction
                    ),
                })
            }
        }
    }
}
