pub mod report;

use crate::coding::CodeTable;
use crate::error::Result;
use crate::types::{HarmonizerConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Command-line arguments for harmonizer
#[derive(Parser, Debug)]
#[command(name = "harmonizer")]
#[command(about = "Classify DICOM images with a vision model and write LOINC codes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model identifier
    #[arg(long, env = "HARMONIZER_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Inference endpoint base URL
    #[arg(long, env = "HARMONIZER_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Give up on the model after this many seconds (no limit by default)
    #[arg(long, env = "HARMONIZER_TIMEOUT", value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// JSON file of extra code rules appended to the LOINC table
    #[arg(long, value_name = "FILE", global = true)]
    pub code_table: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a DICOM image without modifying it
    Analyze {
        /// Path to DICOM file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Classify, map to a code and write the harmonized DICOM file
    Harmonize {
        /// Path to DICOM file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Where to write the result (defaults to <FILE stem>.harmonized.dcm)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

/// Output format options
#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

impl Cli {
    /// Pipeline configuration from flags and environment
    pub fn config(&self) -> HarmonizerConfig {
        HarmonizerConfig::default()
            .with_model(self.model.as_str())
            .with_endpoint(self.endpoint.as_str())
            .with_timeout_secs(self.timeout)
    }

    /// Built-in code table, extended with `--code-table` if given
    pub fn code_table(&self) -> Result<CodeTable> {
        let mut table = CodeTable::loinc();
        if let Some(path) = &self.code_table {
            let added = table.extend_from_reader(BufReader::new(File::open(path)?))?;
            info!("Loaded {} code rule(s) from {}", added, path.display());
        }
        Ok(table)
    }
}

/// Default destination for a harmonized copy of `input`
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}.harmonized.dcm", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["harmonizer", "analyze", "scan.dcm", "--format", "json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Analyze { file } => assert_eq!(file, PathBuf::from("scan.dcm")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_harmonize_with_options() {
        let cli = Cli::try_parse_from([
            "harmonizer",
            "harmonize",
            "scan.dcm",
            "-o",
            "out.dcm",
            "--model",
            "llava:7b",
            "--timeout",
            "30",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.model, "llava:7b");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.coding_scheme.designator, "LN");
        match cli.command {
            Command::Harmonize { output, .. } => {
                assert_eq!(output, Some(PathBuf::from("out.dcm")))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/scan.dcm")),
            PathBuf::from("/data/scan.harmonized.dcm")
        );
        assert_eq!(
            default_output_path(Path::new("IM0001")),
            PathBuf::from("IM0001.harmonized.dcm")
        );
    }

    #[test]
    fn test_code_table_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"body_part": "Head", "modality": "MR", "qualifier": "any_direction", "code": "30657-1", "meaning": "Head MRI"}}]"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["harmonizer", "analyze", "x.dcm", "--code-table", path.as_str()])
            .unwrap();
        assert_eq!(cli.code_table().unwrap().len(), 7);
    }

    #[test]
    fn test_code_table_missing_file() {
        let cli = Cli::try_parse_from([
            "harmonizer",
            "analyze",
            "x.dcm",
            "--code-table",
            "/nonexistent/rules.json",
        ])
        .unwrap();
        assert_eq!(cli.code_table().unwrap_err().kind(), "io_error");
    }
}
