use crate::error::{HarmonizerError, Result};
use crate::extraction::tags::{
    CODE_MEANING, CODE_VALUE, CODING_SCHEME_DESIGNATOR, CODING_SCHEME_VERSION,
};
use crate::types::{CodeEntry, CodingScheme};
use dicom_core::{DataElement, PrimitiveValue, Tag, VR};
use dicom_object::{DefaultDicomObject, InMemDicomObject};
use log::debug;

/// Maximum value length for SH (Short String)
const SH_MAX_LEN: usize = 16;

/// Maximum value length for LO (Long String)
const LO_MAX_LEN: usize = 64;

/// A harmonized object together with its serialized form
#[derive(Debug, Clone)]
pub struct WrittenObject {
    pub object: DefaultDicomObject,
    pub bytes: Vec<u8>,
}

/// The four elements harmonization writes, with their VRs and values
fn code_elements<'a>(entry: &'a CodeEntry, scheme: &'a CodingScheme) -> [(Tag, VR, &'a str); 4] {
    [
        (CODE_VALUE, VR::SH, entry.code.as_str()),
        (CODING_SCHEME_DESIGNATOR, VR::SH, scheme.designator.as_str()),
        (CODING_SCHEME_VERSION, VR::SH, scheme.version.as_str()),
        (CODE_MEANING, VR::LO, entry.meaning.as_str()),
    ]
}

fn check_length(tag: Tag, vr: VR, value: &str) -> Result<()> {
    let max = if vr == VR::LO { LO_MAX_LEN } else { SH_MAX_LEN };
    if value.chars().count() > max {
        return Err(HarmonizerError::Write(format!(
            "value '{}' for {} exceeds {} characters allowed by {:?}",
            value, tag, max, vr
        )));
    }
    Ok(())
}

/// Sets (or overwrites) code value, scheme designator, scheme version and code meaning
///
/// All values are checked before the first element is touched, so on error
/// the object is left as it was.
pub fn apply_code(
    obj: &mut InMemDicomObject,
    entry: &CodeEntry,
    scheme: &CodingScheme,
) -> Result<()> {
    let elements = code_elements(entry, scheme);
    for (tag, vr, value) in elements {
        check_length(tag, vr, value)?;
    }

    for (tag, vr, value) in elements {
        obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }
    Ok(())
}

/// Serializes a DICOM file, preamble included
pub fn write_object(obj: &DefaultDicomObject) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    obj.write_all(&mut buffer)?;
    debug!("Serialized DICOM object ({} bytes)", buffer.len());
    Ok(buffer)
}

/// Applies the code to a copy of the object and serializes it
///
/// The caller's object is never modified; a failure returns no bytes at all.
pub fn write_code(
    obj: &DefaultDicomObject,
    entry: &CodeEntry,
    scheme: &CodingScheme,
) -> Result<WrittenObject> {
    let mut object = obj.clone();
    apply_code(&mut object, entry, scheme)?;
    let bytes = write_object(&object)?;
    Ok(WrittenObject { object, bytes })
}
