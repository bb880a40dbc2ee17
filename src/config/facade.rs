//! Config loader: builds an [`AppConfig`] from layered sources.

use crate::config::{merge, sources, AppConfig};
use crate::error::ApiError;
use config::File;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Lowest to highest precedence: built-in defaults, global XDG file,
    /// workspace `config/config.toml`, workspace `config/{SMSAGENT_ENV}.toml`,
    /// `SMSAGENT__*` environment variables. Conventional provider and Twilio
    /// env vars then fill any credential still empty.
    pub fn load(workspace_root: &Path) -> Result<AppConfig, ApiError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::add_environment(builder)?;

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_env_fallbacks();
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load a single explicit config file over the defaults.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = sources::add_environment(builder)?;

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_env_fallbacks();
        debug!(config_path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }
}
