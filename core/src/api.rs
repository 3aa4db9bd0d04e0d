use crate::coding::{write_code, CodeTable};
use crate::error::Result;
use crate::extraction::tags::{get_string_value, BODY_PART_EXAMINED, MODALITY};
use crate::extraction::{extract, normalize_object, read_object};
use crate::model::{build_prompt, ModelClient, OllamaClient};
use crate::types::{ClassificationRecord, CodeEntry, HarmonizeResponse, HarmonizerConfig};
use dicom_object::DefaultDicomObject;
use log::{debug, info, warn};

/// Classification and harmonization pipeline
///
/// Each call works on its own decoded object and record; the pipeline holds
/// only read-only configuration and can be shared across threads if the
/// client can.
///
/// # Example
///
/// ```no_run
/// use harmonizer_core::{Harmonizer, HarmonizerConfig};
///
/// let harmonizer = Harmonizer::from_config(HarmonizerConfig::default()).unwrap();
/// let bytes = std::fs::read("image.dcm").unwrap();
///
/// let outcome = harmonizer.harmonize(&bytes).unwrap();
/// println!("{} -> {}", outcome.analysis, outcome.code);
/// std::fs::write("image.harmonized.dcm", &outcome.bytes).unwrap();
/// ```
pub struct Harmonizer<C: ModelClient> {
    config: HarmonizerConfig,
    code_table: CodeTable,
    client: C,
}

impl Harmonizer<OllamaClient> {
    /// Creates a pipeline talking to the configured Ollama endpoint
    pub fn from_config(config: HarmonizerConfig) -> Result<Self> {
        let client = OllamaClient::new(&config)?;
        Ok(Self::new(config, client))
    }
}

impl<C: ModelClient> Harmonizer<C> {
    /// Creates a pipeline with the built-in LOINC code table
    pub fn new(config: HarmonizerConfig, client: C) -> Self {
        Self {
            config,
            code_table: CodeTable::loinc(),
            client,
        }
    }

    /// Builder: Replace the code table
    pub fn with_code_table(mut self, code_table: CodeTable) -> Self {
        self.code_table = code_table;
        self
    }

    pub fn config(&self) -> &HarmonizerConfig {
        &self.config
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Classifies the image held in a serialized DICOM file
    ///
    /// # Errors
    ///
    /// - [`crate::HarmonizerError::Decode`] if the bytes are not a DICOM image
    /// - [`crate::HarmonizerError::ModelUnavailable`] if the backend call fails
    ///
    /// An unusable model answer is not an error: it yields the sentinel record.
    pub fn analyze(&self, bytes: &[u8]) -> Result<ClassificationRecord> {
        info!("Received DICOM file of size: {} bytes", bytes.len());
        let obj = read_object(bytes)?;
        self.analyze_object(&obj)
    }

    /// Classifies the image of an already decoded object
    pub fn analyze_object(&self, obj: &DefaultDicomObject) -> Result<ClassificationRecord> {
        debug!(
            "Header modality: {:?}, body part examined: {:?}",
            get_string_value(obj, MODALITY),
            get_string_value(obj, BODY_PART_EXAMINED)
        );

        let encoded = normalize_object(obj, self.config.jpeg_quality)?;
        debug!("Normalized image: {} base64 characters", encoded.len());

        let prompt = build_prompt(&encoded);
        let response = self.client.complete(&prompt)?;

        let extraction = extract(&response);
        info!(
            "Model {} classified image as {} (source: {:?})",
            self.client.model(),
            extraction.record,
            extraction.source
        );
        if !extraction.record.is_within_vocabulary() {
            warn!(
                "Model answer is outside the offered vocabulary: {}",
                extraction.record
            );
        }
        Ok(extraction.record)
    }

    /// Maps a classification to its code
    pub fn map(&self, record: &ClassificationRecord) -> Result<CodeEntry> {
        self.code_table.lookup(record)
    }

    /// Classifies, maps and writes the code into the DICOM file
    ///
    /// A classification without a code aborts before any element is written.
    pub fn harmonize(&self, bytes: &[u8]) -> Result<HarmonizedObject> {
        info!("Received DICOM file of size: {} bytes", bytes.len());
        let obj = read_object(bytes)?;
        let analysis = self.analyze_object(&obj)?;
        let code = self.map(&analysis)?;

        let written = write_code(&obj, &code, &self.config.coding_scheme)?;
        info!(
            "Harmonized object with {} {}",
            self.config.coding_scheme, code
        );

        Ok(HarmonizedObject {
            analysis,
            code,
            bytes: written.bytes,
        })
    }
}

/// Outcome of a successful harmonization
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonizedObject {
    /// Classification the code was derived from
    pub analysis: ClassificationRecord,

    /// Code written into the object
    pub code: CodeEntry,

    /// Serialized modified DICOM file
    pub bytes: Vec<u8>,
}

impl HarmonizedObject {
    /// Success body for this outcome
    pub fn response(&self) -> HarmonizeResponse {
        HarmonizeResponse::new(self.analysis.clone(), self.code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarmonizerError;
    use crate::extraction::tags::{
        CODE_MEANING, CODE_VALUE, CODING_SCHEME_DESIGNATOR, CODING_SCHEME_VERSION,
    };
    use crate::model::ModelResponse;
    use crate::test_utils::{make_ct_bytes, ScriptedClient};
    use serde_json::json;

    fn fenced(record: &str) -> String {
        format!("Sure.\n```json\n{}\n```", record)
    }

    fn harmonizer(client: ScriptedClient) -> Harmonizer<ScriptedClient> {
        Harmonizer::new(HarmonizerConfig::default(), client)
    }

    fn sample_bytes() -> Vec<u8> {
        make_ct_bytes(4, 4, &[0, 40, 80, 120, 160, 200, 240, 280, 320, 360, 400, 440, 480, 520, 560, 600])
    }

    #[test]
    fn test_analyze_sends_image_and_parses_answer() {
        let client = ScriptedClient::text(&fenced(
            r#"{"modality": "CT", "body_part": "Head", "protocol": "Contrast Enhanced", "direction": "Axial"}"#,
        ));
        let harmonizer = harmonizer(client);

        let record = harmonizer.analyze(&sample_bytes()).unwrap();
        assert_eq!(
            record,
            ClassificationRecord::new("CT", "Head", "Contrast Enhanced", "Axial")
        );

        let prompts = harmonizer.client().prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("data:image/jpeg;base64,/9j/"));
    }

    #[test]
    fn test_analyze_falls_back_on_unusable_answer() {
        let envelope = json!({"role": "assistant"});
        let harmonizer = harmonizer(ScriptedClient::answering(ModelResponse::Envelope(envelope)));
        let record = harmonizer.analyze(&sample_bytes()).unwrap();
        assert!(record.is_fallback());
    }

    #[test]
    fn test_analyze_keeps_out_of_vocabulary_answer() {
        let client = ScriptedClient::text(
            r#"{"modality": "MRI", "body_part": "Knee", "protocol": "NA", "direction": "Sagittal"}"#,
        );
        let record = harmonizer(client).analyze(&sample_bytes()).unwrap();
        assert!(!record.is_within_vocabulary());
        assert_eq!(record, ClassificationRecord::new("MRI", "Knee", "NA", "Sagittal"));
    }

    #[test]
    fn test_analyze_rejects_non_dicom() {
        let harmonizer = harmonizer(ScriptedClient::text("{}"));
        let err = harmonizer.analyze(b"definitely not dicom").unwrap_err();
        assert!(matches!(err, HarmonizerError::Decode(_)));
        assert!(harmonizer.client().prompts.borrow().is_empty());
    }

    #[test]
    fn test_model_unavailable_propagates() {
        let harmonizer = harmonizer(ScriptedClient::unavailable());
        let err = harmonizer.harmonize(&sample_bytes()).unwrap_err();
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[test]
    fn test_harmonize_head_ct_with_contrast() {
        let client = ScriptedClient::text(&fenced(
            r#"{"modality": "CT", "body_part": "Head", "protocol": "Contrast Enhanced", "direction": "Axial"}"#,
        ));
        let outcome = harmonizer(client).harmonize(&sample_bytes()).unwrap();

        assert_eq!(outcome.code, CodeEntry::new("24727-0", "Head CT - with contrast"));

        let reread = read_object(&outcome.bytes).unwrap();
        assert_eq!(get_string_value(&reread, CODE_VALUE), Some("24727-0".to_string()));
        assert_eq!(
            get_string_value(&reread, CODE_MEANING),
            Some("Head CT - with contrast".to_string())
        );
        assert_eq!(
            get_string_value(&reread, CODING_SCHEME_DESIGNATOR),
            Some("LN".to_string())
        );
        assert_eq!(
            get_string_value(&reread, CODING_SCHEME_VERSION),
            Some("2.77".to_string())
        );
    }

    #[test]
    fn test_harmonize_chest_xray_lateral() {
        let client = ScriptedClient::text(
            r#"{"modality": "XRAY", "body_part": "Chest", "protocol": "Non Contrast Enhanced", "direction": "Lateral"}"#,
        );
        let outcome = harmonizer(client).harmonize(&sample_bytes()).unwrap();
        assert_eq!(outcome.code, CodeEntry::new("39051-8", "Chest X-ray - LAT"));
    }

    #[test]
    fn test_harmonize_chest_xray_other_direction() {
        let client = ScriptedClient::text(
            r#"{"modality": "XRAY", "body_part": "Chest", "protocol": "Non Contrast Enhanced", "direction": "Axial"}"#,
        );
        let outcome = harmonizer(client).harmonize(&sample_bytes()).unwrap();
        assert_eq!(outcome.code, CodeEntry::new("36572-6", "Chest X-ray - AP/PA"));

        let response = serde_json::to_value(outcome.response()).unwrap();
        assert_eq!(response["status"], "success");
        assert_eq!(response["analysis"]["direction"], "Axial");
    }

    #[test]
    fn test_harmonize_unmapped_body_part_writes_nothing() {
        let client = ScriptedClient::text(
            r#"{"modality": "CT", "body_part": "Abdomen", "protocol": "Contrast Enhanced", "direction": "Axial"}"#,
        );
        let err = harmonizer(client).harmonize(&sample_bytes()).unwrap_err();
        match err {
            HarmonizerError::MappingFailure { body_part, .. } => assert_eq!(body_part, "Abdomen"),
            other => panic!("expected mapping failure, got {:?}", other),
        }
    }

    #[test]
    fn test_harmonize_sentinel_is_mapping_failure() {
        let harmonizer = harmonizer(ScriptedClient::text("I cannot tell."));
        let err = harmonizer.harmonize(&sample_bytes()).unwrap_err();
        assert_eq!(err.kind(), "mapping_failure");
    }

    #[test]
    fn test_harmonize_with_extended_table() {
        let mut table = CodeTable::loinc();
        table
            .extend_from_reader(
                r#"[{"body_part": "Chest", "modality": "CR", "qualifier": "any_direction", "code": "36572-6", "meaning": "Chest X-ray - AP/PA"}]"#.as_bytes(),
            )
            .unwrap();
        let client = ScriptedClient::text(
            r#"{"modality": "CR", "body_part": "Chest", "protocol": "NA", "direction": "Coronal"}"#,
        );

        let outcome = harmonizer(client)
            .with_code_table(table)
            .harmonize(&sample_bytes())
            .unwrap();
        assert_eq!(outcome.code.code, "36572-6");
    }
}
