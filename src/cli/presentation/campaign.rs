//! Campaign presentation: live progress lines and the final summary.

use crate::campaign::{
    CampaignEvent, CampaignReport, CampaignSnapshot, CampaignSummary, ItemStatus,
};
use crate::cli::presentation::shared::{format_section_heading, item_status_label, truncate};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

const MESSAGE_WIDTH: usize = 60;

pub fn format_summary_counter(summary: &CampaignSummary) -> String {
    format!(
        "{}/{} processed | sent {} | failed {} | pending {}",
        summary.processed(),
        summary.total,
        summary.sent,
        summary.failed,
        summary.pending + summary.processing
    )
}

/// One status line for the item that changed in `snapshot`.
pub fn format_progress_line(snapshot: &CampaignSnapshot, color: bool) -> Option<String> {
    let item = snapshot.changed()?;
    let position = format!("[{}/{}]", item.index + 1, snapshot.summary.total);
    let status = item_status_label(item.status, color);
    let line = match item.status {
        ItemStatus::Queued | ItemStatus::Processing => {
            format!("{} {} {}", position, item.address, status)
        }
        ItemStatus::Sent => format!(
            "{} {} {}: {}  ({})",
            position,
            item.address,
            status,
            truncate(&item.generated_text, MESSAGE_WIDTH),
            format_summary_counter(&snapshot.summary)
        ),
        ItemStatus::Failed => format!(
            "{} {} {}: {}  ({})",
            position,
            item.address,
            status,
            item.error.as_deref().unwrap_or("unknown error"),
            format_summary_counter(&snapshot.summary)
        ),
    };
    Some(line)
}

pub fn format_campaign_event(event: &CampaignEvent, color: bool) -> Option<String> {
    match event {
        CampaignEvent::Started { total } => Some(format!("Sending to {} number(s)...", total)),
        CampaignEvent::Updated(snapshot) => format_progress_line(snapshot, color),
        CampaignEvent::Completed(_) => None,
    }
}

pub fn format_campaign_report_text(report: &CampaignReport, color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Number", "Status", "Message / Error"]);
    for item in &report.items {
        let detail = match item.status {
            ItemStatus::Failed => item.error.clone().unwrap_or_default(),
            _ => truncate(&item.generated_text, MESSAGE_WIDTH),
        };
        table.add_row(vec![
            (item.index + 1).to_string(),
            item.address.clone(),
            item_status_label(item.status, color),
            detail,
        ]);
    }

    let elapsed = (report.finished_at - report.started_at).num_seconds();
    format!(
        "{}\n\n{}\n\n{}\nProvider: {} / {}  Language: {}  Elapsed: {}s",
        format_section_heading("Campaign summary", color),
        table,
        format_summary_counter(&report.summary),
        report.provider,
        report.model,
        report.language,
        elapsed
    )
}

pub fn format_campaign_report_json(report: &CampaignReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}
