use dicom_core::Tag;
use dicom_object::InMemDicomObject;

// Code Sequence Attributes written by harmonization
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
pub const CODING_SCHEME_VERSION: Tag = Tag(0x0008, 0x0103);
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);

// Header hints logged next to the model's classification
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
}
