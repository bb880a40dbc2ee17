//! Integration tests for the settings editor over the global config file

use smsagent::config::{xdg, ConfigLoader};
use smsagent::settings::SettingsService;
use tempfile::TempDir;

use crate::integration::with_xdg_env;

#[test]
fn test_global_settings_feed_the_loader() {
    let test_dir = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();

    let config = with_xdg_env(&test_dir, || {
        let settings = SettingsService::global().unwrap();
        assert_eq!(settings.path(), xdg::global_config_path().unwrap());

        settings.set("providers.groq_api_key", "gsk-abcdef1234").unwrap();
        settings.set("gateway.from_number", "+15005550006").unwrap();
        settings.set("campaign.pace_ms", "250").unwrap();

        ConfigLoader::load(workspace.path()).unwrap()
    });

    assert_eq!(config.providers.groq_api_key, "gsk-abcdef1234");
    assert_eq!(config.gateway.from_number, "+15005550006");
    assert_eq!(config.campaign.pace_ms, 250);
}

#[test]
fn test_show_masks_secrets_and_reports_defaults() {
    let test_dir = TempDir::new().unwrap();
    let settings = SettingsService::new(test_dir.path().join("config.toml"));

    let before = settings.show().unwrap();
    assert!(!before.exists);

    let change = settings.set("gateway.auth_token", "twilio-secret-9876").unwrap();
    assert_eq!(change.value.as_deref(), Some("****9876"));

    let shown = settings.show().unwrap();
    assert!(shown.exists);
    let value_of = |key: &str| {
        shown
            .entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value.clone())
    };
    assert_eq!(value_of("gateway.auth_token").as_deref(), Some("****9876"));
    assert_eq!(value_of("campaign.settle_ms").as_deref(), Some("2000"));

    let raw = std::fs::read_to_string(settings.path()).unwrap();
    assert!(raw.contains("twilio-secret-9876"));
}

#[test]
fn test_rejected_writes_leave_the_file_untouched() {
    let test_dir = TempDir::new().unwrap();
    let settings = SettingsService::new(test_dir.path().join("config.toml"));

    assert!(settings.set("campaign.temperature", "9.5").is_err());
    assert!(settings.set("campaign.pace_ms", "soon").is_err());
    assert!(settings.set("providers.unknown_key", "x").is_err());
    assert!(!settings.path().exists());

    settings.set("campaign.max_tokens", "120").unwrap();
    let before = std::fs::read_to_string(settings.path()).unwrap();
    assert!(settings.set("logging.format", "yaml").is_err());
    assert_eq!(std::fs::read_to_string(settings.path()).unwrap(), before);
}

#[test]
fn test_unset_restores_the_default() {
    let test_dir = TempDir::new().unwrap();
    let config_path = test_dir.path().join("config.toml");
    let settings = SettingsService::new(&config_path);

    settings.set("campaign.default_language", "arabic").unwrap();
    let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(loaded.campaign.default_language, "arabic");

    settings.unset("campaign.default_language").unwrap();
    let loaded = ConfigLoader::load_from_file(&config_path).unwrap();
    assert_eq!(loaded.campaign.default_language, "english");
}
