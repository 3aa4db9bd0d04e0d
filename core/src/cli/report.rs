use crate::types::{ClassificationRecord, CodeEntry, CodingScheme};
use std::fmt;
use std::path::Path;

/// Text report formatter for a classification and, after harmonization, its code
pub struct TextReport<'a> {
    analysis: &'a ClassificationRecord,
    code: Option<(&'a CodeEntry, &'a CodingScheme)>,
    output: Option<&'a Path>,
}

impl<'a> TextReport<'a> {
    /// Creates a report for an analysis only
    pub fn new(analysis: &'a ClassificationRecord) -> Self {
        Self {
            analysis,
            code: None,
            output: None,
        }
    }

    /// Adds the code written during harmonization
    pub fn with_code(mut self, code: &'a CodeEntry, scheme: &'a CodingScheme) -> Self {
        self.code = Some((code, scheme));
        self
    }

    /// Adds the path the harmonized file was written to
    pub fn with_output(mut self, output: &'a Path) -> Self {
        self.output = Some(output);
        self
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Classification")?;
        writeln!(f, "==============")?;
        writeln!(f)?;
        writeln!(f, "Modality:   {}", self.analysis.modality)?;
        writeln!(f, "Body Part:  {}", self.analysis.body_part)?;
        writeln!(f, "Protocol:   {}", self.analysis.protocol)?;
        writeln!(f, "Direction:  {}", self.analysis.direction)?;
        if self.analysis.is_fallback() {
            writeln!(f, "(model answer could not be parsed)")?;
        }

        if let Some((code, scheme)) = self.code {
            writeln!(f)?;
            writeln!(f, "Code")?;
            writeln!(f, "----")?;
            writeln!(f, "Code Value: {}", code.code)?;
            writeln!(f, "Meaning:    {}", code.meaning)?;
            writeln!(f, "Scheme:     {}", scheme)?;
        }

        if let Some(output) = self.output {
            writeln!(f)?;
            writeln!(f, "Written to: {}", output.display())?;
        }

        Ok(())
    }
}
