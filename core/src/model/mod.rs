pub mod client;
pub mod prompt;

pub use client::{parse_chat_body, ModelClient, ModelResponse, OllamaClient};
pub use prompt::build_prompt;
