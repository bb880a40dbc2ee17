//! Agent command service: single entry point per agent CLI command variant.
//!
//! Owns agent workflow logic; the CLI parses, calls one method per variant, and formats output.

use crate::agent::documents::{load_dir, load_documents, DocumentBatch};
use crate::agent::persona::Persona;
use crate::agent::registry::{AgentRegistry, ValidationResult};
use crate::agent::template::{slugify, validate_agent_id, AgentTemplate};
use crate::error::ApiError;
use crate::provider::{ProviderCredentials, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

pub struct AgentCommandService;

/// One row of `agent list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListItem {
    pub agent_id: String,
    pub name: String,
    pub provider: String,
    pub model: String,
    pub persona: String,
    pub documents: usize,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct AgentListResult {
    pub agents: Vec<AgentListItem>,
}

#[derive(Debug, Clone)]
pub struct AgentShowResult {
    pub template: AgentTemplate,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AgentValidateAllResult {
    pub results: Vec<(String, ValidationResult)>,
}

/// Inputs for `agent create`.
#[derive(Debug, Clone, Default)]
pub struct AgentCreateRequest {
    pub agent_id: Option<String>,
    pub name: String,
    pub provider: String,
    pub model: String,
    pub persona: Option<String>,
    pub message_prompt: String,
    pub documents: Vec<PathBuf>,
    pub docs_dir: Option<PathBuf>,
    pub force: bool,
}

/// Inputs for `agent edit`; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AgentEditRequest {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub persona: Option<String>,
    pub message_prompt: Option<String>,
    pub add_documents: Vec<PathBuf>,
    pub docs_dir: Option<PathBuf>,
    pub clear_documents: bool,
}

#[derive(Debug, Clone)]
pub struct AgentSaveResult {
    pub agent_id: String,
    pub path: PathBuf,
    pub documents: usize,
    pub skipped_documents: Vec<(PathBuf, String)>,
}

#[derive(Debug, Clone)]
pub struct AgentRemoveResult {
    pub agent_id: String,
    pub path: PathBuf,
}

impl AgentCommandService {
    /// Load explicit files plus an optional directory; rejects are collected, not fatal.
    pub fn gather_documents(
        paths: &[PathBuf],
        dir: Option<&PathBuf>,
    ) -> Result<DocumentBatch, ApiError> {
        let mut batch = load_documents(paths);
        if let Some(dir) = dir {
            let from_dir = load_dir(dir)?;
            batch.documents.extend(from_dir.documents);
            batch.skipped.extend(from_dir.skipped);
        }
        Ok(batch)
    }

    pub fn list(registry: &AgentRegistry) -> AgentListResult {
        let agents = registry
            .list_all()
            .into_iter()
            .map(|a| AgentListItem {
                agent_id: a.agent_id.clone(),
                name: a.name.clone(),
                provider: a.provider.as_str().to_string(),
                model: a.model.clone(),
                persona: a.persona.as_str().to_string(),
                documents: a.documents.len(),
                created_at: a.created_at.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect();
        AgentListResult { agents }
    }

    pub fn show(registry: &AgentRegistry, agent_id: &str) -> Result<AgentShowResult, ApiError> {
        let template = registry.get_or_error(agent_id)?.clone();
        let path = registry.agent_path(agent_id)?;
        Ok(AgentShowResult { template, path })
    }

    pub fn validate_single(
        registry: &AgentRegistry,
        agent_id: &str,
        credentials: &ProviderCredentials,
    ) -> Result<ValidationResult, ApiError> {
        registry.validate_agent(agent_id, credentials)
    }

    pub fn validate_all(
        registry: &AgentRegistry,
        credentials: &ProviderCredentials,
    ) -> AgentValidateAllResult {
        let results = registry
            .list_all()
            .into_iter()
            .map(|agent| {
                let validation = registry
                    .validate_agent(&agent.agent_id, credentials)
                    .unwrap_or_else(|e| {
                        let mut r = ValidationResult::new(agent.agent_id.clone());
                        r.add_error(format!("Failed to validate: {}", e));
                        r
                    });
                (agent.agent_id.clone(), validation)
            })
            .collect();
        AgentValidateAllResult { results }
    }

    /// Create and persist a template. Existing ids are refused unless `force`.
    pub fn create(
        registry: &mut AgentRegistry,
        request: AgentCreateRequest,
    ) -> Result<AgentSaveResult, ApiError> {
        let agent_id = match request.agent_id.as_deref() {
            Some(id) => id.trim().to_string(),
            None => slugify(&request.name),
        };
        validate_agent_id(&agent_id)?;
        if registry.contains(&agent_id) && !request.force {
            return Err(ApiError::InvalidAgent(format!(
                "Agent '{}' already exists (use --force to overwrite)",
                agent_id
            )));
        }

        let provider: ProviderKind = request.provider.parse()?;
        let batch = Self::gather_documents(&request.documents, request.docs_dir.as_ref())?;

        let mut template = AgentTemplate::new(
            agent_id.clone(),
            request.name.trim(),
            provider,
            request.model.trim(),
            request.message_prompt.trim(),
        );
        template.persona = request
            .persona
            .as_deref()
            .map(Persona::from_tag)
            .unwrap_or_default();
        template.documents = batch.documents;

        let documents = template.documents.len();
        let path = registry.save(template)?;
        info!(agent_id = %agent_id, documents, "Agent created");
        Ok(AgentSaveResult {
            agent_id,
            path,
            documents,
            skipped_documents: batch.skipped,
        })
    }

    /// Partial update. New documents are appended after an optional clear.
    pub fn edit(
        registry: &mut AgentRegistry,
        agent_id: &str,
        request: AgentEditRequest,
    ) -> Result<AgentSaveResult, ApiError> {
        let mut template = registry.get_or_error(agent_id)?.clone();

        if let Some(name) = request.name {
            template.name = name.trim().to_string();
        }
        if let Some(provider) = request.provider {
            template.provider = provider.parse()?;
        }
        if let Some(model) = request.model {
            template.model = model.trim().to_string();
        }
        if let Some(persona) = request.persona {
            template.persona = Persona::from_tag(&persona);
        }
        if let Some(prompt) = request.message_prompt {
            template.message_prompt = prompt.trim().to_string();
        }
        if request.clear_documents {
            template.documents.clear();
        }
        let batch = Self::gather_documents(&request.add_documents, request.docs_dir.as_ref())?;
        template.documents.extend(batch.documents);

        let documents = template.documents.len();
        let path = registry.save(template)?;
        info!(agent_id = %agent_id, documents, "Agent updated");
        Ok(AgentSaveResult {
            agent_id: agent_id.to_string(),
            path,
            documents,
            skipped_documents: batch.skipped,
        })
    }

    pub fn remove(
        registry: &mut AgentRegistry,
        agent_id: &str,
    ) -> Result<AgentRemoveResult, ApiError> {
        registry.get_or_error(agent_id)?;
        let path = registry.delete(agent_id)?;
        info!(agent_id = %agent_id, "Agent removed");
        Ok(AgentRemoveResult {
            agent_id: agent_id.to_string(),
            path,
        })
    }
}
