//! OpenAI-compatible chat-completion client.
//!
//! Speaks `POST {base_url}/chat/completions` with a bearer key and reads the
//! reply from `choices[0].message.content`. Any server implementing that
//! protocol (OpenAI, Azure-style proxies, local inference servers) works.

use std::{env, time::Duration};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    client::{ChatModel, ChatRequest},
    error::ExtractionError,
};

/// Longest slice of an error body kept in [`ExtractionError::Service`].
const MAX_ERROR_BODY: usize = 200;

/// Connection settings for the model service.
///
/// Every field has a default, so a partial `[model]` TOML section is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API root, without the `/chat/completions` suffix.
    base_url: String,

    /// Model name sent with every request.
    model: String,

    /// Environment variable holding the API key.
    api_key_env: String,

    /// Whole-request timeout in seconds.
    timeout_secs: u64,

    /// Sampling temperature; omitted from the request when unset.
    temperature: Option<f32>,

    /// Ask the service for a JSON-object response format.
    json_mode: bool,
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn json_mode(&self) -> bool {
        self.json_mode
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key_env(mut self, api_key_env: impl Into<String>) -> Self {
        self.api_key_env = api_key_env.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            temperature: Some(0.0),
            json_mode: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// [`ChatModel`] backed by an OpenAI-compatible HTTP endpoint.
///
/// The client holds only immutable settings and a connection pool, so one
/// instance can be shared by concurrent requests.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: Client,
    config: ModelConfig,
    api_key: Option<String>,
}

impl OpenAiChatModel {
    /// Creates a client from `config`, reading the API key from the
    /// configured environment variable.
    ///
    /// A missing key is not an error (local servers rarely need one); the
    /// request is then sent without an `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ModelConfig) -> Result<Self, ExtractionError> {
        let api_key = env::var(config.api_key_env()).ok().filter(|key| !key.is_empty());
        if api_key.is_none() {
            warn!(api_key_env = config.api_key_env(); "No API key found, sending unauthenticated requests");
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ExtractionError::Config(err.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Overrides the API key read from the environment
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ExtractionError> {
        let body = CompletionBody {
            model: self.config.model(),
            messages: request
                .messages()
                .iter()
                .map(|message| WireMessage {
                    role: message.role().as_str(),
                    content: message.content(),
                })
                .collect(),
            temperature: self.config.temperature(),
            response_format: self
                .config
                .json_mode()
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let url = self.endpoint();
        debug!(url = url.as_str(), model = self.config.model(); "Sending chat completion request");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(service_error(status, &text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| ExtractionError::InvalidResponse(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExtractionError::EmptyReply)
    }
}

fn classify_transport_error(err: reqwest::Error) -> ExtractionError {
    if err.is_connect() || err.is_timeout() {
        ExtractionError::Unreachable(err.to_string())
    } else {
        ExtractionError::Request(err.to_string())
    }
}

fn service_error(status: StatusCode, body: &str) -> ExtractionError {
    let message: String = body.chars().take(MAX_ERROR_BODY).collect();
    ExtractionError::Service {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ExtractionClient;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert_eq!(config.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(!config.json_mode());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = ModelConfig::default().with_base_url("http://localhost:8080/v1/");
        let model = OpenAiChatModel::new(config).unwrap();
        assert_eq!(model.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let request = ExtractionClient::request_for("Alice knows Bob.");
        let body = CompletionBody {
            model: "test-model",
            messages: request
                .messages()
                .iter()
                .map(|message| WireMessage {
                    role: message.role().as_str(),
                    content: message.content(),
                })
                .collect(),
            temperature: None,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Alice knows Bob.");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_service_error_truncates_body() {
        let body = "x".repeat(1000);
        match service_error(StatusCode::BAD_GATEWAY, &body) {
            ExtractionError::Service { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
