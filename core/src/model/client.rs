use crate::error::{HarmonizerError, Result};
use crate::types::HarmonizerConfig;
use log::{debug, info};
use serde_json::{json, Value};

/// Raw answer from an inference backend
///
/// Backends either hand back plain text or a structured envelope that is
/// expected to carry the text in a `content` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    Text(String),
    Envelope(Value),
}

/// A backend able to answer a text prompt
///
/// Implementations make one call per prompt, with no retry. Any transport or
/// backend failure is reported as [`HarmonizerError::ModelUnavailable`].
pub trait ModelClient {
    fn complete(&self, prompt: &str) -> Result<ModelResponse>;

    /// Model identifier used for logging
    fn model(&self) -> &str;
}

/// Client for the Ollama chat API
#[derive(Debug, Clone)]
pub struct OllamaClient {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Creates a client from the pipeline configuration
    ///
    /// The HTTP client only times out when `timeout_secs` is set.
    pub fn new(config: &HarmonizerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.endpoint)
    }

    /// Request body for a single non-streaming chat turn
    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false
        })
    }
}

impl ModelClient for OllamaClient {
    fn complete(&self, prompt: &str) -> Result<ModelResponse> {
        let url = self.chat_url();
        info!("Querying model {} at {}", self.model, url);

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|e| HarmonizerError::ModelUnavailable(format!("{}: {}", url, e)))?
            .error_for_status()?;

        let body = response.text()?;
        debug!("Model raw response: {}", body);
        Ok(parse_chat_body(&body))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Interprets an Ollama response body
///
/// - chat API: `{"message": {"role": ..., "content": ...}}` gives the message envelope
/// - generate API: `{"response": "..."}` gives the text
/// - any other JSON is passed on whole as the envelope
/// - a non-JSON body is passed on as text
pub fn parse_chat_body(body: &str) -> ModelResponse {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return ModelResponse::Text(body.to_string()),
    };

    if let Some(message) = value.get("message").filter(|m| m.is_object()) {
        return ModelResponse::Envelope(message.clone());
    }
    if let Some(text) = value.get("response").and_then(Value::as_str) {
        return ModelResponse::Text(text.to_string());
    }
    ModelResponse::Envelope(value)
}
