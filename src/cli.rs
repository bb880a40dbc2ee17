//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, to_json};
pub use parse::{
    AgentCommands, CampaignCommands, CampaignRunArgs, Cli, Commands, HistoryCommands,
    ProviderCommands, SettingsCommands,
};
pub use presentation::{
    format_campaign_event, format_campaign_report_json, format_campaign_report_text,
    format_history_list_text, format_history_stats_text, format_progress_line,
    format_summary_counter,
};
pub use route::RunContext;
