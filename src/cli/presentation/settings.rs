//! Settings presentation.

use crate::settings::{SettingChange, SettingsShowResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_settings_show_text(result: &SettingsShowResult) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Value"]);
    for entry in &result.entries {
        let value = match entry.value.as_deref() {
            None | Some("") => "(not set)".to_string(),
            Some(v) => v.to_string(),
        };
        table.add_row(vec![entry.key.clone(), value]);
    }
    let origin = if result.exists {
        format!("Config file: {}", result.path.display())
    } else {
        format!("Config file: {} (not created yet; showing defaults)", result.path.display())
    };
    format!("{}\n\n{}", origin, table)
}

pub fn format_settings_show_json(result: &SettingsShowResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_setting_change(change: &SettingChange) -> String {
    match &change.value {
        Some(value) => format!("Set {} = {}\nConfig file: {}", change.key, value, change.path.display()),
        None => format!("Unset {}\nConfig file: {}", change.key, change.path.display()),
    }
}
