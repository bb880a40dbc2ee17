//! Agent registry: in-memory aggregate of loaded agent templates.

use crate::agent::storage::AgentStorage;
use crate::agent::template::AgentTemplate;
use crate::error::ApiError;
use crate::provider::ProviderCredentials;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of `agent validate`: individual checks plus hard errors.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub agent_id: String,
    pub checks: Vec<(String, bool)>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new(agent_id: String) -> Self {
        Self {
            agent_id,
            checks: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_check(&mut self, description: &str, passed: bool) {
        self.checks.push((description.to_string(), passed));
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.checks.iter().all(|(_, passed)| *passed)
    }

    pub fn total_checks(&self) -> usize {
        self.checks.len()
    }

    pub fn passed_checks(&self) -> usize {
        self.checks.iter().filter(|(_, passed)| *passed).count()
    }
}

/// Holds in-memory templates and delegates persistence to the storage port.
pub struct AgentRegistry {
    agents: HashMap<String, AgentTemplate>,
    storage: Arc<dyn AgentStorage>,
}

impl AgentRegistry {
    /// Create a new empty agent registry with default XDG storage
    pub fn new() -> Self {
        Self::with_storage(Arc::new(crate::agent::storage::XdgAgentStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn AgentStorage>) -> Self {
        Self {
            agents: HashMap::new(),
            storage,
        }
    }

    /// Load every stored template, replacing the in-memory set.
    pub fn load(&mut self) -> Result<(), ApiError> {
        self.agents.clear();
        for stored in self.storage.list()? {
            self.agents
                .insert(stored.template.agent_id.clone(), stored.template);
        }
        Ok(())
    }

    pub fn register(&mut self, template: AgentTemplate) {
        self.agents.insert(template.agent_id.clone(), template);
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentTemplate> {
        self.agents.get(agent_id)
    }

    pub fn get_or_error(&self, agent_id: &str) -> Result<&AgentTemplate, ApiError> {
        self.get(agent_id)
            .ok_or_else(|| ApiError::AgentNotFound(agent_id.to_string()))
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    /// All templates, oldest first; ties broken by id.
    pub fn list_all(&self) -> Vec<&AgentTemplate> {
        let mut agents: Vec<_> = self.agents.values().collect();
        agents.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.agent_id.cmp(&b.agent_id))
        });
        agents
    }

    /// Validate and persist, then update the in-memory copy.
    pub fn save(&mut self, template: AgentTemplate) -> Result<PathBuf, ApiError> {
        template.validate()?;
        let path = self.storage.save(&template)?;
        self.register(template);
        Ok(path)
    }

    pub fn delete(&mut self, agent_id: &str) -> Result<PathBuf, ApiError> {
        let path = self.storage.delete(agent_id)?;
        self.agents.remove(agent_id);
        Ok(path)
    }

    pub fn agent_path(&self, agent_id: &str) -> Result<PathBuf, ApiError> {
        self.storage.path_for(agent_id)
    }

    pub fn agents_dir(&self) -> Result<PathBuf, ApiError> {
        self.storage.agents_dir()
    }

    /// Check a template's fields, documents and provider credentials.
    pub fn validate_agent(
        &self,
        agent_id: &str,
        credentials: &ProviderCredentials,
    ) -> Result<ValidationResult, ApiError> {
        let mut result = ValidationResult::new(agent_id.to_string());

        let agent = match self.get(agent_id) {
            Some(a) => a,
            None => {
                result.add_error("Agent not found in registry".to_string());
                return Ok(result);
            }
        };

        let path = self.agent_path(agent_id)?;
        if path.exists() {
            result.add_check("Agent file exists", true);
        } else {
            result.add_error(format!("Agent file not found: {}", path.display()));
        }

        match agent.validate() {
            Ok(()) => result.add_check("Name, model and message prompt are set", true),
            Err(e) => result.add_error(e.to_string()),
        }

        match credentials.require(agent.provider) {
            Ok(()) => result.add_check(
                &format!("{} credentials configured", agent.provider.display_name()),
                true,
            ),
            Err(e) => result.add_error(e.to_string()),
        }

        for doc in &agent.documents {
            if doc.content.trim().is_empty() {
                result.add_error(format!("Document '{}' has no text content", doc.name));
            } else {
                result.add_check(&format!("Document '{}' has content", doc.name), true);
            }
        }

        Ok(result)
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
