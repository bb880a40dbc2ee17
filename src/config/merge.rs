//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("providers.ollama_base_url", "http://localhost:11434")?
        .set_default("campaign.pace_ms", 1000)?
        .set_default("campaign.settle_ms", 2000)?
        .set_default("campaign.default_language", "english")?
        .set_default("campaign.temperature", 0.7)?
        .set_default("campaign.max_tokens", 200)?
        .set_default("storage.history_backend", "sled")
}
