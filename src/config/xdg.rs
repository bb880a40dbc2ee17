//! XDG base directory helpers.
//!
//! `$XDG_CONFIG_HOME/smsagent` holds `config.toml` and `agents/`;
//! `$XDG_DATA_HOME/smsagent` holds the history store and the log file.

use crate::error::ApiError;
use std::path::PathBuf;

const APP_DIR: &str = "smsagent";

/// Config home: `$XDG_CONFIG_HOME`, falling back to the platform config directory.
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Some(dir) = non_empty_env("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(dir));
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ApiError::ConfigError("Unable to determine config directory".to_string()))
}

/// Data home: `$XDG_DATA_HOME`, falling back to the platform data directory.
pub fn data_home() -> Result<PathBuf, ApiError> {
    if let Some(dir) = non_empty_env("XDG_DATA_HOME") {
        return Ok(PathBuf::from(dir));
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ApiError::ConfigError("Unable to determine data directory".to_string()))
}

/// `$XDG_CONFIG_HOME/smsagent`
pub fn app_config_dir() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join(APP_DIR))
}

/// `$XDG_CONFIG_HOME/smsagent/config.toml`
pub fn global_config_path() -> Result<PathBuf, ApiError> {
    Ok(app_config_dir()?.join("config.toml"))
}

/// `$XDG_CONFIG_HOME/smsagent/agents`, created on demand.
pub fn agents_dir() -> Result<PathBuf, ApiError> {
    ensure_dir(app_config_dir()?.join("agents"))
}

/// `$XDG_DATA_HOME/smsagent`, created on demand.
pub fn data_dir() -> Result<PathBuf, ApiError> {
    ensure_dir(data_home()?.join(APP_DIR))
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ApiError> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;
    }
    Ok(dir)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
