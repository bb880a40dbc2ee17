//! Agent storage port: persistence for agent templates.

pub mod xdg;

use crate::agent::template::AgentTemplate;
use crate::error::ApiError;
use std::path::PathBuf;

pub use xdg::XdgAgentStorage;

/// A template as loaded from storage, with where it came from.
#[derive(Debug, Clone)]
pub struct StoredAgent {
    pub template: AgentTemplate,
    pub path: PathBuf,
}

pub trait AgentStorage: Send + Sync {
    /// Every readable template; unreadable entries are skipped.
    fn list(&self) -> Result<Vec<StoredAgent>, ApiError>;

    fn path_for(&self, agent_id: &str) -> Result<PathBuf, ApiError>;

    fn save(&self, template: &AgentTemplate) -> Result<PathBuf, ApiError>;

    fn delete(&self, agent_id: &str) -> Result<PathBuf, ApiError>;

    fn agents_dir(&self) -> Result<PathBuf, ApiError>;
}
