//! Agent command presentation: list, show, save, validation text/json.

use crate::agent::commands::{AgentListResult, AgentRemoveResult, AgentSaveResult, AgentShowResult};
use crate::agent::ValidationResult;
use comfy_table::Table;
use serde_json::json;

pub fn format_agent_list_result_text(result: &AgentListResult) -> String {
    let agents = &result.agents;
    if agents.is_empty() {
        return "No agents found.\n\nCreate one with `smsagent agent create`.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Provider", "Model", "Persona", "Docs", "Created"]);
    for item in agents {
        table.add_row(vec![
            item.agent_id.clone(),
            item.name.clone(),
            item.provider.clone(),
            item.model.clone(),
            item.persona.clone(),
            item.documents.to_string(),
            item.created_at.clone(),
        ]);
    }
    format!("{}\n\nTotal: {} agent(s)", table, agents.len())
}

pub fn format_agent_list_result_json(result: &AgentListResult) -> String {
    let out = json!({ "agents": result.agents, "total": result.agents.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_agent_show_result_text(result: &AgentShowResult, include_documents: bool) -> String {
    let t = &result.template;
    let mut output = format!("Agent: {} ({})\n", t.name, t.agent_id);
    output.push_str(&format!("Provider: {}\n", t.provider.display_name()));
    output.push_str(&format!("Model: {}\n", t.model));
    output.push_str(&format!("Persona: {}\n", t.persona));
    output.push_str(&format!("Created: {}\n", t.created_at.to_rfc3339()));
    output.push_str(&format!("File: {}\n", result.path.display()));
    output.push_str("\nMessage prompt:\n");
    output.push_str(&t.message_prompt);
    output.push('\n');

    if t.documents.is_empty() {
        output.push_str("\nKnowledge documents: none\n");
    } else {
        output.push_str(&format!("\nKnowledge documents ({}):\n", t.documents.len()));
        for (i, doc) in t.documents.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} ({} chars)\n",
                i + 1,
                doc.name,
                doc.content.chars().count()
            ));
            if include_documents {
                output.push_str(&format!("{}\n\n", doc.content));
            }
        }
    }
    output
}

pub fn format_agent_show_result_json(result: &AgentShowResult) -> String {
    let out = json!({
        "agent": result.template,
        "path": result.path,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_agent_save_result(verb: &str, result: &AgentSaveResult) -> String {
    let mut output = format!(
        "Agent {}: {}\nConfiguration file: {}\nKnowledge documents: {}",
        verb,
        result.agent_id,
        result.path.display(),
        result.documents
    );
    if !result.skipped_documents.is_empty() {
        output.push_str(&format!(
            "\n\nSkipped documents ({}):",
            result.skipped_documents.len()
        ));
        for (path, reason) in &result.skipped_documents {
            output.push_str(&format!("\n  - {}: {}", path.display(), reason));
        }
    }
    output
}

pub fn format_agent_remove_result(result: &AgentRemoveResult) -> String {
    format!(
        "Removed agent: {}\nConfiguration file: {}",
        result.agent_id,
        result.path.display()
    )
}

pub fn format_validation_result(result: &ValidationResult, verbose: bool) -> String {
    let mut output = format!("Validating agent: {}\n\n", result.agent_id);

    if result.errors.is_empty() && result.checks.iter().all(|(_, passed)| *passed) {
        output.push_str("✓ All validation checks passed\n\n");
    } else {
        for (description, passed) in &result.checks {
            if *passed {
                output.push_str(&format!("✓ {}\n", description));
            } else {
                output.push_str(&format!("✗ {}\n", description));
            }
        }
        if !result.errors.is_empty() {
            output.push('\n');
            for error in &result.errors {
                output.push_str(&format!("✗ {}\n", error));
            }
        }
        output.push('\n');
    }

    if verbose {
        output.push_str(&format!(
            "Validation summary: {}/{} checks passed\n",
            result.passed_checks(),
            result.total_checks()
        ));
    } else if result.is_valid() {
        output.push_str(&format!(
            "Validation passed: {}/{} checks\n",
            result.passed_checks(),
            result.total_checks()
        ));
    } else {
        output.push_str(&format!(
            "Validation failed: {} error(s) found\n",
            result.errors.len()
        ));
    }
    output
}

pub fn format_validation_results_all(
    results: &[(String, ValidationResult)],
    verbose: bool,
) -> String {
    let mut output = String::from("Validating all agents:\n\n");
    let mut valid_count = 0;

    for (agent_id, result) in results {
        if result.is_valid() {
            valid_count += 1;
            output.push_str(&format!("✓ {}: Valid\n", agent_id));
        } else {
            output.push_str(&format!("✗ {}: Validation failed\n", agent_id));
            if verbose {
                for error in &result.errors {
                    output.push_str(&format!("  ✗ {}\n", error));
                }
            }
        }
    }
    output.push_str(&format!(
        "\nSummary: {} valid, {} invalid (out of {} total)\n",
        valid_count,
        results.len() - valid_count,
        results.len()
    ));
    output
}
