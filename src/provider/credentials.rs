//! Provider credentials as they appear under `[providers]` in config.

use crate::error::ApiError;
use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    #[serde(default)]
    pub groq_api_key: String,

    #[serde(default)]
    pub openai_api_key: String,

    #[serde(default)]
    pub anthropic_api_key: String,

    #[serde(default)]
    pub openrouter_api_key: String,

    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    /// Bearer token for Ollama deployments behind an auth proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_base_url: Option<String>,

    /// Sent as `HTTP-Referer` to OpenRouter when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_referer: Option<String>,
}

fn default_ollama_base_url() -> String {
    ProviderKind::Ollama.default_base_url().to_string()
}

impl Default for ProviderCredentials {
    fn default() -> Self {
        Self {
            groq_api_key: String::new(),
            openai_api_key: String::new(),
            anthropic_api_key: String::new(),
            openrouter_api_key: String::new(),
            ollama_base_url: default_ollama_base_url(),
            ollama_api_key: None,
            groq_base_url: None,
            openai_base_url: None,
            anthropic_base_url: None,
            openrouter_base_url: None,
            openrouter_referer: None,
        }
    }
}

impl ProviderCredentials {
    /// API key for `kind`; `None` when blank or when the provider takes no key.
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        let key = match kind {
            ProviderKind::Groq => self.groq_api_key.as_str(),
            ProviderKind::OpenAI => self.openai_api_key.as_str(),
            ProviderKind::Anthropic => self.anthropic_api_key.as_str(),
            ProviderKind::OpenRouter => self.openrouter_api_key.as_str(),
            ProviderKind::Ollama => self.ollama_api_key.as_deref().unwrap_or(""),
        };
        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Endpoint root for `kind`, with overrides applied and trailing slash removed.
    pub fn base_url(&self, kind: ProviderKind) -> String {
        let url = match kind {
            ProviderKind::Groq => self.groq_base_url.as_deref(),
            ProviderKind::OpenAI => self.openai_base_url.as_deref(),
            ProviderKind::Anthropic => self.anthropic_base_url.as_deref(),
            ProviderKind::OpenRouter => self.openrouter_base_url.as_deref(),
            ProviderKind::Ollama => Some(self.ollama_base_url.as_str()),
        }
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| kind.default_base_url());
        url.trim_end_matches('/').to_string()
    }

    /// Ollama counts as configured when its base URL is set; the rest need a key.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        if kind.requires_api_key() {
            self.api_key(kind).is_some()
        } else {
            !self.ollama_base_url.trim().is_empty()
        }
    }

    pub fn require(&self, kind: ProviderKind) -> Result<(), ApiError> {
        if self.is_configured(kind) {
            return Ok(());
        }
        let what = if kind.requires_api_key() {
            "API key"
        } else {
            "base URL"
        };
        Err(ApiError::ProviderNotConfigured(format!(
            "{} {} is not set (providers.{}_{} or {})",
            kind.display_name(),
            what,
            kind.as_str(),
            if kind.requires_api_key() { "api_key" } else { "base_url" },
            kind.credential_env_var()
        )))
    }

    /// Fill blank credentials from GROQ_API_KEY, OPENAI_API_KEY and friends.
    pub fn fill_from_env(&mut self) {
        fill(&mut self.groq_api_key, ProviderKind::Groq.credential_env_var());
        fill(&mut self.openai_api_key, ProviderKind::OpenAI.credential_env_var());
        fill(
            &mut self.anthropic_api_key,
            ProviderKind::Anthropic.credential_env_var(),
        );
        fill(
            &mut self.openrouter_api_key,
            ProviderKind::OpenRouter.credential_env_var(),
        );
        if let Ok(url) = std::env::var(ProviderKind::Ollama.credential_env_var()) {
            let url = url.trim();
            if !url.is_empty()
                && (self.ollama_base_url.trim().is_empty()
                    || self.ollama_base_url == default_ollama_base_url())
            {
                self.ollama_base_url = url.to_string();
            }
        }
    }

    /// Credential shown in `provider list` and `settings show`.
    pub fn masked(&self, kind: ProviderKind) -> String {
        match kind {
            ProviderKind::Ollama => self.base_url(kind),
            _ => self
                .api_key(kind)
                .map(mask_secret)
                .unwrap_or_else(|| "(not set)".to_string()),
        }
    }
}

fn fill(slot: &mut String, var: &str) {
    if !slot.trim().is_empty() {
        return;
    }
    if let Ok(value) = std::env::var(var) {
        let value = value.trim();
        if !value.is_empty() {
            *slot = value.to_string();
        }
    }
}

/// Keep the last four characters of a secret visible.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
