pub mod api;
pub mod cli;
pub mod coding;
pub mod error;
pub mod extraction;
pub mod model;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use api::{HarmonizedObject, Harmonizer};
pub use cli::report::TextReport;
pub use coding::{CodeRule, CodeTable, Qualifier};
pub use error::{HarmonizerError, Result};
pub use model::{ModelClient, ModelResponse, OllamaClient};
pub use types::*;
