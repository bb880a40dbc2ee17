//! History presentation: record list, stats, clear.

use crate::cli::presentation::shared::{delivery_status_label, truncate};
use crate::history::{HistoryRecord, HistoryStats};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_history_list_text(records: &[HistoryRecord], color: bool) -> String {
    if records.is_empty() {
        return "No messages in history.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Time", "Number", "Status", "Provider", "Message"]);
    for record in records {
        let message = match (&record.error, record.text.is_empty()) {
            (Some(error), true) => error.clone(),
            _ => truncate(&record.text, 50),
        };
        table.add_row(vec![
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.address.clone(),
            delivery_status_label(record.status, color),
            format!("{}/{}", record.provider, record.model),
            message,
        ]);
    }
    format!("{}\n\n{} record(s)", table, records.len())
}

pub fn format_history_list_json(records: &[HistoryRecord]) -> String {
    let out = json!({ "records": records, "total": records.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_history_stats_text(stats: &HistoryStats, backend: &str) -> String {
    let mut output = format!(
        "Total messages: {}\nSent: {}\nFailed: {}\nSuccess rate: {:.1}%\n",
        stats.total,
        stats.sent,
        stats.failed,
        stats.success_rate() * 100.0
    );
    if let Some(latest) = stats.latest {
        output.push_str(&format!("Latest: {}\n", latest.format("%Y-%m-%d %H:%M:%S")));
    }
    if !stats.by_provider.is_empty() {
        output.push_str("\nBy provider:\n");
        for (provider, count) in &stats.by_provider {
            output.push_str(&format!("  {:<12} {}\n", provider, count));
        }
    }
    output.push_str(&format!("\nBackend: {}", backend));
    output
}

pub fn format_history_stats_json(stats: &HistoryStats, backend: &str) -> String {
    let out = json!({
        "stats": stats,
        "success_rate": stats.success_rate(),
        "backend": backend,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_history_clear_result(removed: usize) -> String {
    format!("Cleared {} history record(s).", removed)
}
