//! CLI parse: clap types for smsagent. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// smsagent - AI-generated SMS campaigns from reusable agent templates
#[derive(Parser)]
#[command(name = "smsagent")]
#[command(about = "Generate and send paced SMS campaigns with LLM providers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for workspace config files)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage agent templates
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Run SMS campaigns
    Campaign {
        #[command(subcommand)]
        command: CampaignCommands,
    },
    /// Inspect and clear delivery history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Inspect generation providers
    Provider {
        #[command(subcommand)]
        command: ProviderCommands,
    },
    /// View and edit the global config file
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
pub enum AgentCommands {
    /// List saved agents
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one agent
    Show {
        agent_id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Print knowledge document contents
        #[arg(long)]
        include_documents: bool,
    },
    /// Create an agent (prompts for missing fields)
    Create {
        /// Agent id (derived from the name when omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Provider (groq, openai, ollama, anthropic, openrouter)
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// Persona (sales or support)
        #[arg(long)]
        persona: Option<String>,
        /// Message prompt
        #[arg(long)]
        prompt: Option<String>,
        /// Knowledge document (.txt or .pdf); repeatable
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,
        /// Directory of knowledge documents
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Overwrite an existing agent with the same id
        #[arg(long)]
        force: bool,
        /// Fail instead of prompting for missing fields
        #[arg(long)]
        non_interactive: bool,
    },
    /// Update an agent's fields
    Edit {
        agent_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        persona: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        /// Knowledge document to append; repeatable
        #[arg(long = "doc")]
        docs: Vec<PathBuf>,
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Drop existing documents before appending
        #[arg(long)]
        clear_docs: bool,
    },
    /// Remove an agent
    Remove {
        agent_id: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Validate agent configuration
    Validate {
        agent_id: Option<String>,
        /// Validate all agents
        #[arg(long)]
        all: bool,
        /// Show detailed results
        #[arg(long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
pub enum CampaignCommands {
    /// Generate and send one message per destination
    Run(CampaignRunArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct CampaignRunArgs {
    /// Use a saved agent's provider, model, persona, prompt and documents
    #[arg(long, conflicts_with_all = ["provider", "model", "persona", "prompt"])]
    pub agent: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub persona: Option<String>,
    /// Message prompt
    #[arg(long)]
    pub prompt: Option<String>,
    /// Additional knowledge document; repeatable
    #[arg(long = "doc")]
    pub docs: Vec<PathBuf>,
    #[arg(long)]
    pub docs_dir: Option<PathBuf>,
    /// Destination number; repeatable, commas allowed
    #[arg(long = "to")]
    pub to: Vec<String>,
    /// File with one number per line (commas also accepted)
    #[arg(long)]
    pub numbers_file: Option<PathBuf>,
    /// Message language (english, hindi, arabic, ...)
    #[arg(long)]
    pub language: Option<String>,
    /// Override the delay after each message
    #[arg(long)]
    pub pace_ms: Option<u64>,
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List delivery records, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
        /// Filter by status (sent or failed)
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive search in number and message
        #[arg(long)]
        search: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Totals and success rate
    Stats {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Delete every record
    Clear {
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProviderCommands {
    /// List providers and whether credentials are configured
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List models served by a provider
    Models {
        provider: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show every setting (secrets masked)
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set a dotted key, e.g. providers.groq_api_key
    Set { key: String, value: String },
    /// Remove a key so its default applies
    Unset { key: String },
}
