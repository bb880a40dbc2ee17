//! Storage section: which history backend to open and where.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// History persistence backend, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// sled database under the data dir
    #[default]
    Sled,
    /// Append-only JSON lines file under the data dir
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub history_backend: HistoryBackend,

    /// Overrides `$XDG_DATA_HOME/smsagent`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Data directory for this run, created if missing.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    ApiError::ConfigError(format!(
                        "Failed to create data directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
                Ok(dir.clone())
            }
            None => crate::config::xdg::data_dir(),
        }
    }

    pub fn history_db_path(&self) -> Result<PathBuf, ApiError> {
        Ok(self.resolve_data_dir()?.join("history.db"))
    }

    pub fn history_file_path(&self) -> Result<PathBuf, ApiError> {
        Ok(self.resolve_data_dir()?.join("history.jsonl"))
    }
}
