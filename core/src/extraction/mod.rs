pub mod object;
pub mod pixels;
pub mod response;
pub mod tags;

pub use object::{has_preamble, read_object};
pub use pixels::{encode_jpeg_base64, normalize, normalize_object, PixelGrid, FLAT_IMAGE_VALUE};
pub use response::{extract, extract_record, Extraction, ExtractionSource, RejectReason};
pub use tags::*;
