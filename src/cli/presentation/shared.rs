//! Shared presentation helpers: headings, status colouring, truncation.

use crate::campaign::ItemStatus;
use crate::history::DeliveryStatus;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Colour only when stdout is a terminal and NO_COLOR is unset.
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

pub fn item_status_label(status: ItemStatus, color: bool) -> String {
    let label = status.as_str();
    if !color {
        return label.to_string();
    }
    match status {
        ItemStatus::Queued => format!("{}", label.dimmed()),
        ItemStatus::Processing => format!("{}", label.yellow()),
        ItemStatus::Sent => format!("{}", label.green()),
        ItemStatus::Failed => format!("{}", label.red()),
    }
}

pub fn delivery_status_label(status: DeliveryStatus, color: bool) -> String {
    let label = status.as_str();
    match (status, color) {
        (_, false) => label.to_string(),
        (DeliveryStatus::Sent, true) => format!("{}", label.green()),
        (DeliveryStatus::Failed, true) => format!("{}", label.red()),
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let kept: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
