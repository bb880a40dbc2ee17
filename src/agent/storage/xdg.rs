use super::{AgentStorage, StoredAgent};
use crate::agent::template::{validate_agent_id, AgentTemplate};
use crate::error::ApiError;
use std::ffi::OsStr;
use std::path::PathBuf;

/// One TOML file per agent under `$XDG_CONFIG_HOME/smsagent/agents`.
pub struct XdgAgentStorage {
    root: Option<PathBuf>,
}

impl XdgAgentStorage {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Store agents under an explicit directory instead of the XDG location.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
        }
    }

    fn dir(&self) -> Result<PathBuf, ApiError> {
        match &self.root {
            Some(dir) => {
                if !dir.exists() {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        ApiError::ConfigError(format!(
                            "Failed to create agents directory {}: {}",
                            dir.display(),
                            e
                        ))
                    })?;
                }
                Ok(dir.clone())
            }
            None => crate::config::xdg::agents_dir(),
        }
    }
}

impl Default for XdgAgentStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentStorage for XdgAgentStorage {
    fn list(&self) -> Result<Vec<StoredAgent>, ApiError> {
        let agents_dir = self.dir()?;
        let entries = std::fs::read_dir(&agents_dir).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read agents directory {}: {}",
                agents_dir.display(),
                e
            ))
        })?;

        let mut loaded = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read directory entry in {}: {}",
                        agents_dir.display(),
                        e
                    );
                    continue;
                }
            };

            let path = entry.path();
            if path.extension() != Some(OsStr::new("toml")) {
                continue;
            }

            let file_id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(id) => id.to_string(),
                None => {
                    tracing::warn!("Invalid agent filename (non-UTF8): {:?}", path);
                    continue;
                }
            };

            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Failed to read agent file {}: {}", path.display(), e);
                    continue;
                }
            };

            let template: AgentTemplate = match toml::from_str(&content) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to parse agent file {}: {}", path.display(), e);
                    continue;
                }
            };

            if template.agent_id != file_id {
                tracing::warn!(
                    "Agent ID mismatch in {}: filename={}, template={}",
                    path.display(),
                    file_id,
                    template.agent_id
                );
            }

            loaded.push(StoredAgent { template, path });
        }

        Ok(loaded)
    }

    fn path_for(&self, agent_id: &str) -> Result<PathBuf, ApiError> {
        validate_agent_id(agent_id)?;
        Ok(self.dir()?.join(format!("{}.toml", agent_id)))
    }

    fn save(&self, template: &AgentTemplate) -> Result<PathBuf, ApiError> {
        let path = self.path_for(&template.agent_id)?;
        let content = toml::to_string_pretty(template).map_err(|e| {
            ApiError::ConfigError(format!("Failed to serialize agent template: {}", e))
        })?;
        std::fs::write(&path, content).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to write agent template to {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(path)
    }

    fn delete(&self, agent_id: &str) -> Result<PathBuf, ApiError> {
        let path = self.path_for(agent_id)?;
        if !path.exists() {
            return Err(ApiError::AgentNotFound(agent_id.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to delete agent file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(path)
    }

    fn agents_dir(&self) -> Result<PathBuf, ApiError> {
        self.dir()
    }
}
