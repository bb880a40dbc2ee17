//! CLI presentation: text and json formatters per command family.

mod agent;
mod campaign;
mod history;
mod provider;
mod settings;
mod shared;

pub use agent::{
    format_agent_list_result_json, format_agent_list_result_text, format_agent_remove_result,
    format_agent_save_result, format_agent_show_result_json, format_agent_show_result_text,
    format_validation_result, format_validation_results_all,
};
pub use campaign::{
    format_campaign_event, format_campaign_report_json, format_campaign_report_text,
    format_progress_line, format_summary_counter,
};
pub use history::{
    format_history_clear_result, format_history_list_json, format_history_list_text,
    format_history_stats_json, format_history_stats_text,
};
pub use provider::{
    format_provider_list_result_json, format_provider_list_result_text,
    format_provider_models_json, format_provider_models_text,
};
pub use settings::{format_setting_change, format_settings_show_json, format_settings_show_text};
pub use shared::use_color;
