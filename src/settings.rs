//! Settings: view and edit the global config file.
//!
//! Keys are dotted (`providers.groq_api_key`, `campaign.pace_ms`). Only keys in
//! [`SETTING_KEYS`] can be written, and a write is refused if the resulting file
//! would no longer load as a valid [`AppConfig`].

use crate::config::{xdg, AppConfig};
use crate::error::ApiError;
use crate::provider::credentials::mask_secret;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Secret,
    Text,
    Integer,
    Float,
    Bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SettingKey {
    pub key: &'static str,
    pub kind: SettingKind,
}

const fn setting(key: &'static str, kind: SettingKind) -> SettingKey {
    SettingKey { key, kind }
}

pub const SETTING_KEYS: &[SettingKey] = &[
    setting("providers.groq_api_key", SettingKind::Secret),
    setting("providers.openai_api_key", SettingKind::Secret),
    setting("providers.anthropic_api_key", SettingKind::Secret),
    setting("providers.openrouter_api_key", SettingKind::Secret),
    setting("providers.ollama_base_url", SettingKind::Text),
    setting("providers.ollama_api_key", SettingKind::Secret),
    setting("providers.groq_base_url", SettingKind::Text),
    setting("providers.openai_base_url", SettingKind::Text),
    setting("providers.anthropic_base_url", SettingKind::Text),
    setting("providers.openrouter_base_url", SettingKind::Text),
    setting("providers.openrouter_referer", SettingKind::Text),
    setting("gateway.account_sid", SettingKind::Text),
    setting("gateway.auth_token", SettingKind::Secret),
    setting("gateway.from_number", SettingKind::Text),
    setting("gateway.base_url", SettingKind::Text),
    setting("campaign.pace_ms", SettingKind::Integer),
    setting("campaign.settle_ms", SettingKind::Integer),
    setting("campaign.default_language", SettingKind::Text),
    setting("campaign.temperature", SettingKind::Float),
    setting("campaign.max_tokens", SettingKind::Integer),
    setting("storage.history_backend", SettingKind::Text),
    setting("storage.data_dir", SettingKind::Text),
    setting("logging.enabled", SettingKind::Bool),
    setting("logging.level", SettingKind::Text),
    setting("logging.format", SettingKind::Text),
    setting("logging.output", SettingKind::Text),
    setting("logging.file", SettingKind::Text),
];

pub fn lookup_key(key: &str) -> Option<SettingKey> {
    SETTING_KEYS.iter().copied().find(|k| k.key == key)
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingEntry {
    pub key: String,
    pub kind: SettingKind,
    /// Display value; secrets are masked. `None` when unset.
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsShowResult {
    pub path: PathBuf,
    pub exists: bool,
    pub entries: Vec<SettingEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingChange {
    pub key: String,
    pub path: PathBuf,
    /// Masked for secrets
    pub value: Option<String>,
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service over `$XDG_CONFIG_HOME/smsagent/config.toml`.
    pub fn global() -> Result<Self, ApiError> {
        Ok(Self::new(xdg::global_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, ApiError> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_table(&self, table: &toml::Table) -> Result<(), ApiError> {
        let rendered = toml::to_string_pretty(table)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize settings: {}", e)))?;

        let config: AppConfig = toml::from_str(&rendered)
            .map_err(|e| ApiError::ConfigError(format!("Invalid setting: {}", e)))?;
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        std::fs::write(&self.path, rendered).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn config(&self) -> Result<AppConfig, ApiError> {
        let table = self.read_table()?;
        toml::Value::Table(table)
            .try_into()
            .map_err(|e| ApiError::ConfigError(format!("Invalid config file: {}", e)))
    }

    /// Every known setting as stored in the file, defaults filled in.
    pub fn show(&self) -> Result<SettingsShowResult, ApiError> {
        let config = self.config()?;
        let values = toml::Value::try_from(&config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize settings: {}", e)))?;

        let entries = SETTING_KEYS
            .iter()
            .map(|setting| {
                let value = dotted_get(&values, setting.key)
                    .and_then(display_value)
                    .map(|v| match setting.kind {
                        SettingKind::Secret if !v.is_empty() => mask_secret(&v),
                        _ => v,
                    });
                SettingEntry {
                    key: setting.key.to_string(),
                    kind: setting.kind,
                    value,
                }
            })
            .collect();

        Ok(SettingsShowResult {
            path: self.path.clone(),
            exists: self.path.exists(),
            entries,
        })
    }

    pub fn set(&self, key: &str, raw: &str) -> Result<SettingChange, ApiError> {
        let setting = lookup_key(key)
            .ok_or_else(|| ApiError::ConfigError(format!("Unknown setting: {}", key)))?;
        let value = parse_value(setting, raw)?;

        let mut table = self.read_table()?;
        let (section, field) = split_key(setting.key);
        let section_table = table
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        match section_table {
            toml::Value::Table(t) => {
                t.insert(field.to_string(), value);
            }
            _ => {
                return Err(ApiError::ConfigError(format!(
                    "[{}] in {} is not a table",
                    section,
                    self.path.display()
                )))
            }
        }
        self.write_table(&table)?;

        info!(key = setting.key, path = %self.path.display(), "Setting updated");
        Ok(SettingChange {
            key: setting.key.to_string(),
            path: self.path.clone(),
            value: Some(match setting.kind {
                SettingKind::Secret => mask_secret(raw.trim()),
                _ => raw.trim().to_string(),
            }),
        })
    }

    /// Remove a key so the default (or a lower layer) applies again.
    pub fn unset(&self, key: &str) -> Result<SettingChange, ApiError> {
        let setting = lookup_key(key)
            .ok_or_else(|| ApiError::ConfigError(format!("Unknown setting: {}", key)))?;
        let mut table = self.read_table()?;
        let (section, field) = split_key(setting.key);
        if let Some(toml::Value::Table(t)) = table.get_mut(section) {
            t.remove(field);
        }
        self.write_table(&table)?;

        info!(key = setting.key, path = %self.path.display(), "Setting removed");
        Ok(SettingChange {
            key: setting.key.to_string(),
            path: self.path.clone(),
            value: None,
        })
    }
}

fn split_key(key: &str) -> (&str, &str) {
    key.split_once('.').unwrap_or(("", key))
}

fn dotted_get<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |value, part| value.get(part))
}

fn display_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn parse_value(setting: SettingKey, raw: &str) -> Result<toml::Value, ApiError> {
    let raw = raw.trim();
    let invalid = |expected: &str| {
        ApiError::ConfigError(format!(
            "Invalid value for {}: expected {}, got '{}'",
            setting.key, expected, raw
        ))
    };
    match setting.kind {
        SettingKind::Secret | SettingKind::Text => Ok(toml::Value::String(raw.to_string())),
        SettingKind::Integer => raw
            .parse::<u64>()
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .map(toml::Value::Integer)
            .ok_or_else(|| invalid("a non-negative integer")),
        SettingKind::Float => raw
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|_| invalid("a number")),
        SettingKind::Bool => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|_| invalid("true or false")),
    }
}
