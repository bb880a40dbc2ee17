//! Agent template: a saved, reusable generation configuration.

use crate::agent::persona::Persona;
use crate::error::ApiError;
use crate::provider::ProviderKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-supplied text used to ground generated messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Size in bytes of the source file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl KnowledgeDocument {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            media_type: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub agent_id: String,
    pub name: String,
    pub provider: ProviderKind,
    pub model: String,
    #[serde(default)]
    pub persona: Persona,
    pub message_prompt: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<KnowledgeDocument>,
}

impl AgentTemplate {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        provider: ProviderKind,
        model: impl Into<String>,
        message_prompt: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            provider,
            model: model.into(),
            persona: Persona::default(),
            message_prompt: message_prompt.into(),
            created_at: Utc::now(),
            documents: Vec::new(),
        }
    }

    /// Name, model and message prompt must be non-blank.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if self.agent_id.trim().is_empty() {
            missing.push("id");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.model.trim().is_empty() {
            missing.push("model");
        }
        if self.message_prompt.trim().is_empty() {
            missing.push("message prompt");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::InvalidAgent(format!(
                "{} cannot be empty",
                missing.join(", ")
            )))
        }
    }
}

/// Derive a filesystem-safe agent id from a display name.
///
/// `"Spring Sale (EU)"` becomes `"spring-sale-eu"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Agent ids become file names; keep them to `[a-z0-9_-]`.
pub fn validate_agent_id(agent_id: &str) -> Result<(), ApiError> {
    if agent_id.is_empty() {
        return Err(ApiError::InvalidAgent("agent id cannot be empty".to_string()));
    }
    if !agent_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ApiError::InvalidAgent(format!(
            "agent id '{}' may only contain lowercase letters, digits, '-' and '_'",
            agent_id
        )));
    }
    Ok(())
}
