//! Provider command presentation: list and models text/json.

use crate::provider::commands::{ProviderListResult, ProviderModelsResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_provider_list_result_text(result: &ProviderListResult, color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Provider", "Name", "Status", "Credential", "Base URL"]);
    for entry in &result.providers {
        let status = match (entry.configured, color) {
            (true, true) => format!("{}", "configured".green()),
            (false, true) => format!("{}", "not configured".red()),
            (true, false) => "configured".to_string(),
            (false, false) => "not configured".to_string(),
        };
        table.add_row(vec![
            entry.provider.clone(),
            entry.display_name.clone(),
            status,
            entry.credential.clone(),
            entry.base_url.clone(),
        ]);
    }
    let configured = result.providers.iter().filter(|p| p.configured).count();
    format!(
        "{}\n\n{}/{} provider(s) configured",
        table,
        configured,
        result.providers.len()
    )
}

pub fn format_provider_list_result_json(result: &ProviderListResult) -> String {
    let out = json!({ "providers": result.providers, "total": result.providers.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_provider_models_text(result: &ProviderModelsResult) -> String {
    if result.models.is_empty() {
        return format!("No models reported by {}.", result.provider);
    }
    let mut output = format!("Models available from {}:\n", result.provider);
    for model in &result.models {
        output.push_str(&format!("  {}\n", model));
    }
    output.push_str(&format!("\nTotal: {} model(s)", result.models.len()));
    output
}

pub fn format_provider_models_json(result: &ProviderModelsResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
}
