//! Config file and environment sources, added in precedence order by the loader.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

/// Environment overrides: `SMSAGENT__GATEWAY__AUTH_TOKEN` maps to `gateway.auth_token`.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("SMSAGENT")
            .prefix_separator("__")
            .separator("__"),
    ))
}
