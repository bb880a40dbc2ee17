//! Global config file source: $XDG_CONFIG_HOME/smsagent/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use tracing::debug;

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let Ok(path) = crate::config::xdg::global_config_path() else {
        return Ok(builder);
    };

    if path.exists() {
        Ok(builder.add_source(File::from(path).required(false)))
    } else {
        debug!(
            config_path = %path.display(),
            "No global configuration file; run `smsagent settings set` to create one"
        );
        Ok(builder)
    }
}
