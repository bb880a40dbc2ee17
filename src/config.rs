//! Configuration System
//!
//! Layered runtime configuration: provider credentials, delivery gateway credentials,
//! campaign pacing, storage backend selection and logging. See [`ConfigLoader`] for
//! source precedence.

use crate::gateway::GatewayCredentials;
use crate::logging::LoggingConfig;
use crate::provider::ProviderCredentials;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;
mod storage;
pub mod xdg;

pub use facade::ConfigLoader;
pub use storage::{HistoryBackend, StorageConfig};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation provider credentials
    #[serde(default)]
    pub providers: ProviderCredentials,

    /// Delivery gateway credentials
    #[serde(default)]
    pub gateway: GatewayCredentials,

    /// Campaign pacing and generation defaults
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// History storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Campaign pacing and generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Delay after every item, success or failure
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,

    /// Idle delay between the last item and the completion signal
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_pace_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_language() -> String {
    "english".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    200
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            pace_ms: default_pace_ms(),
            settle_ms: default_settle_ms(),
            default_language: default_language(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl CampaignConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_language.trim().is_empty() {
            return Err("default_language cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Campaign(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Campaign(msg) => write!(f, "Campaign: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AppConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.campaign.validate() {
            errors.push(ValidationError::Campaign(e));
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            errors.push(ValidationError::Logging(format!(
                "Invalid log format: {}",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fill empty credentials from conventional env vars (OPENAI_API_KEY, TWILIO_AUTH_TOKEN, ...).
    pub fn apply_env_fallbacks(&mut self) {
        self.providers.fill_from_env();
        self.gateway.fill_from_env();
    }
}
