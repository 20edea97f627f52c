//! Transport to an OpenAI-compatible chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::LlmClientError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Connection settings for the ranking backend
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Scheme and host, without the `/v1/...` path
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl LlmConfig {
    /// Config for the public endpoint with default model and temperature
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// One ranking call: a system message, the instruction, and output settings
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRequest {
    pub system: String,
    pub instruction: String,
    /// Ask the backend for a JSON object instead of free text
    pub json_output: bool,
    pub temperature: f32,
}

/// A text-generation service that answers a ranking instruction.
///
/// Returns the raw generated text; interpreting it is the caller's job.
#[async_trait]
pub trait RankingBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &RankingRequest) -> Result<String, LlmClientError>;
}

/// Chat-completions client.
///
/// No retries and no request timeout: a slow backend delays the request
/// that is waiting on it.
#[derive(Clone)]
pub struct OpenAiChatBackend {
    client: Client,
    config: LlmConfig,
}

impl OpenAiChatBackend {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn auth_header(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.config.api_key))
    }

    fn request_body(&self, request: &RankingRequest) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.instruction },
            ],
            "temperature": request.temperature,
        });
        if request.json_output {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl RankingBackend for OpenAiChatBackend {
    fn name(&self) -> &str {
        "OpenAiChatBackend"
    }

    async fn generate(&self, request: &RankingRequest) -> Result<String, LlmClientError> {
        let url = self.endpoint();
        let (header, value) = self.auth_header();
        debug!("Sending ranking request to {} (model {})", url, self.config.model);

        let resp = self
            .client
            .post(&url)
            .header(header, value)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| {
                error!("Ranking backend unreachable: {}", e);
                LlmClientError::ConnectionError(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Ranking backend returned {}: {}", status, body);
            return Err(LlmClientError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        let resp_json: Value = resp
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let message = resp_json["choices"]
            .get(0)
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| LlmClientError::InvalidResponse("No choices in completion".into()))?;

        // A null content is an empty answer, not a broken one
        Ok(message["content"].as_str().unwrap_or_default().to_string())
    }
}
