//! HTTP clients for each provider wire format.
//!
//! Groq, OpenAI and OpenRouter share the OpenAI chat-completions shape; Anthropic
//! and Ollama each have their own.

use crate::error::ApiError;
use crate::provider::{
    build_provider_http_client, error_from_response, extract_error_message, map_http_error,
    ChatMessage, CompletionOptions, CompletionResponse, MessageRole, ModelProviderClient,
    ProviderKind, TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 200;

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

fn to_wire(messages: Vec<ChatMessage>) -> Vec<WireMessage> {
    messages
        .into_iter()
        .map(|msg| WireMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content),
        })
        .collect()
}

/// Client for OpenAI-style `/chat/completions` endpoints (OpenAI, Groq, OpenRouter)
pub struct OpenAICompatibleClient {
    client: Client,
    kind: ProviderKind,
    model: String,
    api_key: Option<String>,
    base_url: String,
    extra_headers: Vec<(&'static str, String)>,
}

impl OpenAICompatibleClient {
    pub fn new(
        kind: ProviderKind,
        model: String,
        api_key: Option<String>,
        base_url: String,
        extra_headers: Vec<(&'static str, String)>,
    ) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        Ok(Self {
            client,
            kind,
            model,
            api_key,
            base_url,
            extra_headers,
        })
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        for (name, value) in &self.extra_headers {
            request = request.header(*name, value);
        }
        request
    }

    /// OpenRouter reports some failures inside a 200 body.
    fn check_body_error(&self, body: &str) -> Result<(), ApiError> {
        if self.kind != ProviderKind::OpenRouter {
            return Ok(());
        }
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => return Ok(()),
        };
        if value.get("error").is_none() {
            return Ok(());
        }
        let message = extract_error_message(body).unwrap_or_else(|| "Unknown error".to_string());
        if message.to_lowercase().contains("rate limit") {
            return Err(ApiError::ProviderRateLimit(format!(
                "{} API error: {}",
                self.kind.display_name(),
                message
            )));
        }
        Err(ApiError::ProviderRequestFailed(format!(
            "{} API error: {}",
            self.kind.display_name(),
            message
        )))
    }
}

#[async_trait]
impl ModelProviderClient for OpenAICompatibleClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let provider = self.kind.display_name();
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: to_wire(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(provider = self.kind.as_str(), model = %self.model, "Sending completion request");
        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_http_error(provider, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(provider, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_http_error(provider, e))?;
        self.check_body_error(&body)?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse {} response: {}", provider, e))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ProviderError(format!("No choices in {} response", provider)))?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            usage: completion.usage.map(TokenUsage::from).unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        self.kind.as_str()
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let provider = self.kind.display_name();
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| map_http_error(provider, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(provider, response).await);
        }

        #[derive(Deserialize)]
        struct ModelsResponse {
            data: Vec<ModelInfo>,
        }
        #[derive(Deserialize)]
        struct ModelInfo {
            id: String,
        }

        let models: ModelsResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse models response: {}", e))
        })?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

/// Anthropic Messages API client
pub struct AnthropicClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(model: String, api_key: String, base_url: String) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        Ok(Self {
            client,
            model,
            api_key,
            base_url,
        })
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    content: Vec<AnthropicContent>,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl ModelProviderClient for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        // System prompt travels outside the message list
        let mut system_parts = Vec::new();
        let mut conversation = Vec::new();
        for msg in messages {
            match msg.role {
                MessageRole::System => system_parts.push(msg.content),
                MessageRole::User => conversation.push(AnthropicMessage {
                    role: "user",
                    content: msg.content,
                }),
                MessageRole::Assistant => conversation.push(AnthropicMessage {
                    role: "assistant",
                    content: msg.content,
                }),
            }
        }

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: options.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
            system: if system_parts.is_empty() {
                None
            } else {
                Some(system_parts.join("\n\n"))
            },
            messages: conversation,
            temperature: options.temperature,
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!(provider = "anthropic", model = %self.model, "Sending completion request");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_http_error("Anthropic", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Anthropic", response).await);
        }

        let completion: AnthropicResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let content = completion
            .content
            .into_iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let usage = completion
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            usage,
            finish_reason: completion.stop_reason,
        })
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/v1/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .map_err(|e| map_http_error("Anthropic", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Anthropic", response).await);
        }

        #[derive(Deserialize)]
        struct ModelsResponse {
            data: Vec<ModelInfo>,
        }
        #[derive(Deserialize)]
        struct ModelInfo {
            id: String,
        }

        let models: ModelsResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse models response: {}", e))
        })?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

/// Ollama native chat client (`/api/chat`, non-streaming)
pub struct OllamaClient {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
}

impl OllamaClient {
    pub fn new(model: String, base_url: String, api_key: Option<String>) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        Ok(Self {
            client,
            model,
            base_url,
            api_key,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: Option<WireMessage>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: u32,
    #[serde(default)]
    eval_count: u32,
}

#[async_trait]
impl ModelProviderClient for OllamaClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: to_wire(messages),
            stream: false,
            options: OllamaOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        debug!(provider = "ollama", model = %self.model, url = %url, "Sending completion request");
        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_http_error("Ollama", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        let completion: OllamaChatResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(CompletionResponse {
            content: completion
                .message
                .and_then(|m| m.content)
                .unwrap_or_default(),
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            usage: TokenUsage {
                prompt_tokens: completion.prompt_eval_count,
                completion_tokens: completion.eval_count,
                total_tokens: completion.prompt_eval_count + completion.eval_count,
            },
            finish_reason: completion.done_reason,
        })
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| map_http_error("Ollama", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }
        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            ApiError::ProviderError(format!("Failed to parse models response: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
