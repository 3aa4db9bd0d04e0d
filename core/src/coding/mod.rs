pub mod table;
pub mod writer;

pub use table::{CodeRule, CodeTable, Qualifier, LOINC_RULES};
pub use writer::{apply_code, write_code, write_object, WrittenObject};
