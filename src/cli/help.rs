//! CLI help: stable dotted command names for logging spans.

use crate::cli::parse::{
    AgentCommands, CampaignCommands, Commands, HistoryCommands, ProviderCommands,
    SettingsCommands,
};

/// Command name string (e.g. "campaign.run", "agent.list").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Agent { command } => format!("agent.{}", agent_command_name(command)),
        Commands::Campaign { command } => format!("campaign.{}", campaign_command_name(command)),
        Commands::History { command } => format!("history.{}", history_command_name(command)),
        Commands::Provider { command } => format!("provider.{}", provider_command_name(command)),
        Commands::Settings { command } => format!("settings.{}", settings_command_name(command)),
    }
}

pub fn agent_command_name(command: &AgentCommands) -> &'static str {
    match command {
        AgentCommands::List { .. } => "list",
        AgentCommands::Show { .. } => "show",
        AgentCommands::Create { .. } => "create",
        AgentCommands::Edit { .. } => "edit",
        AgentCommands::Remove { .. } => "remove",
        AgentCommands::Validate { .. } => "validate",
    }
}

pub fn campaign_command_name(command: &CampaignCommands) -> &'static str {
    match command {
        CampaignCommands::Run(_) => "run",
    }
}

pub fn history_command_name(command: &HistoryCommands) -> &'static str {
    match command {
        HistoryCommands::List { .. } => "list",
        HistoryCommands::Stats { .. } => "stats",
        HistoryCommands::Clear { .. } => "clear",
    }
}

pub fn provider_command_name(command: &ProviderCommands) -> &'static str {
    match command {
        ProviderCommands::List { .. } => "list",
        ProviderCommands::Models { .. } => "models",
    }
}

pub fn settings_command_name(command: &SettingsCommands) -> &'static str {
    match command {
        SettingsCommands::Show { .. } => "show",
        SettingsCommands::Set { .. } => "set",
        SettingsCommands::Unset { .. } => "unset",
    }
}
