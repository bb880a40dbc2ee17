//! Text Generation Providers
//!
//! Uniform interface over the LLM backends a campaign can generate with (Groq, OpenAI,
//! Ollama, Anthropic, OpenRouter). A provider turns a system + user prompt into one
//! message body; everything wire-specific stays inside [`clients`].

use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub mod clients;
pub mod commands;
pub mod credentials;
pub mod kind;

pub use clients::{AnthropicClient, OllamaClient, OpenAICompatibleClient};
pub use commands::{
    ProviderCommandService, ProviderListResult, ProviderModelsResult, ProviderStatusEntry,
};
pub use credentials::ProviderCredentials;
pub use kind::ProviderKind;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Completion options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: Option<f32>, // 0.0-2.0
    pub max_tokens: Option<u32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: Some(0.7),
            max_tokens: Some(200),
        }
    }
}

impl From<&crate::config::CampaignConfig> for CompletionOptions {
    fn from(config: &crate::config::CampaignConfig) -> Self {
        Self {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: Option<String>,
}

/// Model provider client trait
#[async_trait]
pub trait ModelProviderClient: Send + Sync {
    /// Generate a completion from a list of messages
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// List available models from the provider
    async fn list_models(&self) -> Result<Vec<String>, ApiError>;

    /// Generate one message body from a system and user prompt.
    ///
    /// Content is trimmed; blank content is [`ApiError::EmptyGeneration`].
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, ApiError> {
        let messages = vec![ChatMessage::system(system_prompt), ChatMessage::user(user_prompt)];
        let response = self.complete(messages, options).await?;
        let content = response.content.trim();
        if content.is_empty() {
            return Err(ApiError::EmptyGeneration);
        }
        Ok(content.to_string())
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

// Transport-level failures (no HTTP status available)
pub(crate) fn map_http_error(provider: &str, error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::ProviderRequestFailed(format!("{} request timeout: {}", provider, error))
    } else if error.is_connect() {
        ApiError::ProviderRequestFailed(format!("{} connection error: {}", provider, error))
    } else {
        ApiError::ProviderError(format!("{} HTTP error: {}", provider, error))
    }
}

// Non-success HTTP status with the provider's own error message
pub(crate) fn map_status_error(provider: &str, status: u16, message: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::ProviderAuthFailed(format!("{} API error: {}", provider, message)),
        429 => ApiError::ProviderRateLimit(format!("{} API error: {}", provider, message)),
        404 => ApiError::ProviderModelNotFound(format!("{} API error: {}", provider, message)),
        _ => ApiError::ProviderRequestFailed(format!("{} API error: {}", provider, message)),
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}` and `{"message": ..}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match value.get("error") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(err) => err
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        None => None,
    };
    message.or_else(|| {
        value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
    })
}

/// Read a failed response into an [`ApiError`], preferring the body's message.
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    map_status_error(provider, status.as_u16(), &message)
}

/// Provider factory for creating provider clients
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the client for `kind`, failing fast when its credential is missing.
    pub fn create_client(
        kind: ProviderKind,
        model: &str,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn ModelProviderClient>, ApiError> {
        credentials.require(kind)?;
        let model = model.to_string();
        let base_url = credentials.base_url(kind);
        let api_key = credentials.api_key(kind).map(str::to_string);

        let client: Arc<dyn ModelProviderClient> = match kind {
            ProviderKind::Groq | ProviderKind::OpenAI => Arc::new(OpenAICompatibleClient::new(
                kind, model, api_key, base_url, Vec::new(),
            )?),
            ProviderKind::OpenRouter => {
                let mut headers = vec![("X-Title", "smsagent".to_string())];
                if let Some(referer) = credentials.openrouter_referer.as_deref() {
                    headers.push(("HTTP-Referer", referer.to_string()));
                }
                Arc::new(OpenAICompatibleClient::new(
                    kind, model, api_key, base_url, headers,
                )?)
            }
            ProviderKind::Anthropic => Arc::new(AnthropicClient::new(
                model,
                api_key.unwrap_or_default(),
                base_url,
            )?),
            ProviderKind::Ollama => Arc::new(OllamaClient::new(model, base_url, api_key)?),
        };
        Ok(client)
    }
}

// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    responses: Vec<Result<String, String>>,
    current: std::sync::Arc<std::sync::Mutex<usize>>,
    provider_name: String,
    model_name: String,
}

#[cfg(test)]
impl MockProvider {
    /// Each call pops the next scripted outcome; the last one repeats.
    pub fn new(provider_name: &str, model_name: &str, responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses,
            current: std::sync::Arc::new(std::sync::Mutex::new(0)),
            provider_name: provider_name.to_string(),
            model_name: model_name.to_string(),
        }
    }

    pub fn calls(&self) -> usize {
        *self.current.lock().unwrap()
    }
}

#[cfg(test)]
#[async_trait]
impl ModelProviderClient for MockProvider {
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let mut idx = self.current.lock().unwrap();
        let scripted = self
            .responses
            .get(*idx)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_else(|| Ok("Mock response".to_string()));
        *idx += 1;

        let content = scripted.map_err(ApiError::ProviderRequestFailed)?;
        Ok(CompletionResponse {
            content,
            model: self.model_name.clone(),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec![self.model_name.clone()])
    }
}
