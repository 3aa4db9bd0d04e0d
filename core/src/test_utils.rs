//! Fixtures shared by unit tests

use crate::error::{HarmonizerError, Result};
use crate::extraction::tags::MODALITY;
use crate::model::{ModelClient, ModelResponse};
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_dictionary_std::tags::{
    BITS_ALLOCATED, BITS_STORED, COLUMNS, HIGH_BIT, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA,
    PIXEL_REPRESENTATION, ROWS, SAMPLES_PER_PIXEL, SOP_CLASS_UID, SOP_INSTANCE_UID,
};
use dicom_object::meta::FileMetaTableBuilder;
use dicom_object::{DefaultDicomObject, FileDicomObject, FileMetaTable};
use std::cell::RefCell;

const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
const SOP_INSTANCE: &str = "2.25.137038125948464847900039011591283709926";

pub fn make_file_meta() -> FileMetaTable {
    FileMetaTableBuilder::new()
        .media_storage_sop_class_uid(CT_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(SOP_INSTANCE)
        .transfer_syntax("1.2.840.10008.1.2.1") // Explicit VR Little Endian
        .build()
        .unwrap()
}

/// Minimal single-frame 16-bit monochrome CT object
pub fn make_ct_object(rows: u16, columns: u16, values: &[u16]) -> DefaultDicomObject {
    let mut obj = FileDicomObject::new_empty_with_meta(make_file_meta());

    obj.put(DataElement::new(
        SOP_CLASS_UID,
        VR::UI,
        PrimitiveValue::from(CT_IMAGE_STORAGE),
    ));
    obj.put(DataElement::new(
        SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(SOP_INSTANCE),
    ));
    obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("CT")));
    obj.put(DataElement::new(
        SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(1_u16),
    ));
    obj.put(DataElement::new(
        PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    obj.put(DataElement::new(ROWS, VR::US, PrimitiveValue::from(rows)));
    obj.put(DataElement::new(COLUMNS, VR::US, PrimitiveValue::from(columns)));
    obj.put(DataElement::new(
        BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(16_u16),
    ));
    obj.put(DataElement::new(BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
    obj.put(DataElement::new(HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
    obj.put(DataElement::new(
        PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));
    obj.put(DataElement::new(
        PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(values.iter().copied().collect()),
    ));

    obj
}

/// Serialized form of [`make_ct_object`], preamble included
pub fn make_ct_bytes(rows: u16, columns: u16, values: &[u16]) -> Vec<u8> {
    let mut buffer = Vec::new();
    make_ct_object(rows, columns, values)
        .write_all(&mut buffer)
        .unwrap();
    buffer
}

/// Model client replaying a canned answer and recording prompts
pub struct ScriptedClient {
    answer: Option<ModelResponse>,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedClient {
    pub fn answering(answer: ModelResponse) -> Self {
        Self {
            answer: Some(answer),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn text(answer: &str) -> Self {
        Self::answering(ModelResponse::Text(answer.to_string()))
    }

    pub fn unavailable() -> Self {
        Self {
            answer: None,
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl ModelClient for ScriptedClient {
    fn complete(&self, prompt: &str) -> Result<ModelResponse> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer
            .clone()
            .ok_or_else(|| HarmonizerError::ModelUnavailable("connection refused".to_string()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
