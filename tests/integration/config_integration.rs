//! Integration tests for Configuration System

use smsagent::config::{ConfigLoader, HistoryBackend};
use smsagent::error::ApiError;
use smsagent::provider::ProviderKind;
use tempfile::TempDir;

use crate::integration::{with_env, with_xdg_env};

#[test]
fn test_load_from_file_reads_every_section() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("smsagent.toml");

    std::fs::write(
        &config_file,
        r#"
[providers]
groq_api_key = "gsk-file"

[gateway]
account_sid = "AC123"
auth_token = "secret"
from_number = "+15005550006"

[campaign]
pace_ms = 250
default_language = "arabic"

[storage]
history_backend = "file"

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = with_xdg_env(&temp_dir, || ConfigLoader::load_from_file(&config_file)).unwrap();
    assert!(config.validate().is_ok());

    assert_eq!(config.providers.groq_api_key, "gsk-file");
    assert!(config.providers.require(ProviderKind::Groq).is_ok());
    assert!(config.gateway.is_configured());
    assert_eq!(config.campaign.pace_ms, 250);
    // Unset keys keep their defaults.
    assert_eq!(config.campaign.settle_ms, 2000);
    assert_eq!(config.campaign.default_language, "arabic");
    assert_eq!(config.storage.history_backend, HistoryBackend::File);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_missing_explicit_file_is_a_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ApiError::ConfigError(_)));
    assert!(err.is_configuration());
}

#[test]
fn test_workspace_defaults_without_any_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_xdg_env(&temp_dir, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.campaign.pace_ms, 1000);
    assert_eq!(config.providers.ollama_base_url, "http://localhost:11434");
    assert_eq!(config.storage.history_backend, HistoryBackend::Sled);
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let global_dir = temp_dir.path().join("smsagent");
    std::fs::create_dir_all(&global_dir).unwrap();
    std::fs::write(
        global_dir.join("config.toml"),
        "[campaign]\npace_ms = 500\ndefault_language = \"hindi\"\n",
    )
    .unwrap();

    let workspace_config = workspace.path().join("config");
    std::fs::create_dir_all(&workspace_config).unwrap();
    std::fs::write(workspace_config.join("config.toml"), "[campaign]\npace_ms = 50\n").unwrap();

    let config = with_xdg_env(&temp_dir, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.campaign.pace_ms, 50);
    assert_eq!(config.campaign.default_language, "hindi");
}

#[test]
fn test_prefixed_environment_overrides_files() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let workspace_config = workspace.path().join("config");
    std::fs::create_dir_all(&workspace_config).unwrap();
    std::fs::write(
        workspace_config.join("config.toml"),
        "[gateway]\nfrom_number = \"+10000000000\"\n",
    )
    .unwrap();

    let config = with_env(
        &temp_dir,
        &[("SMSAGENT__GATEWAY__FROM_NUMBER", "+15551234567")],
        || ConfigLoader::load(workspace.path()),
    )
    .unwrap();
    assert_eq!(config.gateway.from_number, "+15551234567");
}

#[test]
fn test_conventional_env_vars_fill_blank_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let workspace_config = workspace.path().join("config");
    std::fs::create_dir_all(&workspace_config).unwrap();
    std::fs::write(
        workspace_config.join("config.toml"),
        "[gateway]\nauth_token = \"from-file\"\n",
    )
    .unwrap();

    let config = with_env(
        &temp_dir,
        &[
            ("TWILIO_ACCOUNT_SID", "AC-env"),
            ("TWILIO_AUTH_TOKEN", "from-env"),
            ("TWILIO_FROM_NUMBER", "+15005550006"),
            ("OPENROUTER_API_KEY", "sk-or-env"),
        ],
        || ConfigLoader::load(workspace.path()),
    )
    .unwrap();

    assert_eq!(config.gateway.account_sid, "AC-env");
    // Configured values win over the fallback.
    assert_eq!(config.gateway.auth_token, "from-file");
    assert_eq!(config.gateway.from_number, "+15005550006");
    assert_eq!(config.providers.openrouter_api_key, "sk-or-env");
}

#[test]
fn test_invalid_campaign_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "[campaign]\ntemperature = 5.0\nmax_tokens = 0\n").unwrap();

    let config = with_xdg_env(&temp_dir, || ConfigLoader::load_from_file(&config_file)).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().starts_with("Campaign:"));
}
