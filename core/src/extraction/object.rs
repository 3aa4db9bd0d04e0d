use crate::error::{HarmonizerError, Result};
use dicom_object::{DefaultDicomObject, OpenFileOptions};
use log::debug;

/// Length of the optional preamble preceding the `DICM` magic code
pub const PREAMBLE_LEN: usize = 128;

const MAGIC: &[u8; 4] = b"DICM";

/// Checks if a byte stream starts with the 128-byte preamble and `DICM` magic
pub fn has_preamble(bytes: &[u8]) -> bool {
    bytes.len() >= PREAMBLE_LEN + MAGIC.len()
        && &bytes[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] == MAGIC
}

/// Decodes a DICOM file held in memory
///
/// Accepts the byte stream with or without the preamble. Anything that is not
/// a DICOM file (no `DICM` magic, truncated meta group, bad data set) is a
/// [`HarmonizerError::Decode`].
pub fn read_object(bytes: &[u8]) -> Result<DefaultDicomObject> {
    let body = if has_preamble(bytes) {
        &bytes[PREAMBLE_LEN..]
    } else {
        bytes
    };

    if !body.starts_with(MAGIC) {
        return Err(HarmonizerError::Decode(
            "input is not a DICOM file (missing DICM magic)".to_string(),
        ));
    }

    let obj = OpenFileOptions::new().from_reader(body)?;
    debug!(
        "Decoded DICOM object with transfer syntax {}",
        obj.meta().transfer_syntax()
    );
    Ok(obj)
}
