//! HTTP generation clients.

use super::{GenerationBackend, GenerationRequest, SYSTEM_PROMPT};
use crate::error::PipelineError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const BACKEND_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const BACKEND_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub(crate) fn build_backend_http_client() -> Result<Client, PipelineError> {
    Client::builder()
        .connect_timeout(BACKEND_HTTP_CONNECT_TIMEOUT)
        .timeout(BACKEND_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| PipelineError::Config(format!("Failed to create HTTP client: {}", e)))
}

// Timeouts land in Transport, so a stalled call routes to fallback like any other
// generation error.
pub(crate) fn map_http_error(error: reqwest::Error) -> PipelineError {
    if let Some(status) = error.status() {
        map_status(status, &error.to_string())
    } else if error.is_timeout() {
        PipelineError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        PipelineError::Transport(format!("Connection error: {}", error))
    } else {
        PipelineError::Transport(format!("HTTP error: {}", error))
    }
}

pub(crate) fn map_status(status: StatusCode, body: &str) -> PipelineError {
    match status.as_u16() {
        401 | 403 => PipelineError::AuthFailed(format!("status {}: {}", status, body)),
        404 => PipelineError::ModelNotFound(format!("status {}: {}", status, body)),
        429 => PipelineError::RateLimited(format!("status {}: {}", status, body)),
        _ => PipelineError::Transport(format!("status {}: {}", status, body)),
    }
}

async fn error_for_response(response: reqwest::Response) -> PipelineError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    map_status(status, &body)
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints (OpenAI, Ollama, local servers)
pub struct OpenAiCompatibleClient {
    client: Client,
    name: &'static str,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        name: &'static str,
        base_url: String,
        api_key: Option<String>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_backend_http_client()?,
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await.map_err(map_http_error)?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Transport(format!("Malformed response body: {}", e)))?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Transport("No choices in response".to_string()))?;

        debug!(
            backend = self.name,
            subject_id = %request.subject_id,
            response_chars = choice.message.content.chars().count(),
            "Completion received"
        );
        Ok(choice.message.content)
    }

    fn backend_name(&self) -> &str {
        self.name
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Anthropic messages API client
pub struct AnthropicClient {
    client: Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Result<Self, PipelineError> {
        Ok(Self {
            client: build_backend_http_client()?,
            api_key,
        })
    }
}

#[async_trait]
impl GenerationBackend for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, PipelineError> {
        let body = json!({
            "model": request.model,
            "max_tokens": request.sampling.max_tokens,
            "temperature": request.sampling.temperature,
            "system": SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        let response = self
            .client
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(map_http_error)?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let message: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Transport(format!("Malformed response body: {}", e)))?;
        let text: String = message
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(PipelineError::Transport(
                "Response contained no text blocks".to_string(),
            ));
        }
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "anthropic"
    }
}
