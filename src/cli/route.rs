//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::agent::{AgentCommandService, AgentCreateRequest, AgentEditRequest, AgentRegistry};
use crate::campaign::{
    parse_destinations, CampaignEvent, CampaignLauncher, CampaignRequest, SequencerConfig,
};
use crate::cli::parse::{
    AgentCommands, CampaignCommands, CampaignRunArgs, Commands, HistoryCommands,
    ProviderCommands, SettingsCommands,
};
use crate::cli::{command_name, presentation};
use crate::config::{AppConfig, ConfigLoader};
use crate::error::ApiError;
use crate::history::{open_history_store, DeliveryStatus, HistoryFilter, HistoryStore};
use crate::provider::ProviderCommandService;
use crate::settings::SettingsService;
use futures::StreamExt;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded config, agent registry, history store and settings.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    config: AppConfig,
    workspace_root: PathBuf,
    agents: RwLock<AgentRegistry>,
    history: Arc<dyn HistoryStore>,
    settings: SettingsService,
    interactive: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }

        let mut agents = AgentRegistry::new();
        agents.load()?;
        let history = open_history_store(&config.storage)?;
        let settings = match config_path {
            Some(path) => SettingsService::new(path),
            None => SettingsService::global()?,
        };

        Ok(Self::from_parts(workspace_root, config, agents, history, settings))
    }

    /// Assemble a context from already-built parts. Prompts are disabled.
    pub fn from_parts(
        workspace_root: PathBuf,
        config: AppConfig,
        agents: AgentRegistry,
        history: Arc<dyn HistoryStore>,
        settings: SettingsService,
    ) -> Self {
        Self {
            config,
            workspace_root,
            agents: RwLock::new(agents),
            history,
            settings,
            interactive: false,
        }
    }

    /// Allow dialoguer prompts for missing input and confirmations.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, workspace = %self.workspace_root.display(), "Executing command");
        let result = self.execute_inner(command).await;
        info!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Agent { command } => self.handle_agent_command(command),
            Commands::Campaign { command } => match command {
                CampaignCommands::Run(args) => self.handle_campaign_run(args).await,
            },
            Commands::History { command } => self.handle_history_command(command),
            Commands::Provider { command } => self.handle_provider_command(command).await,
            Commands::Settings { command } => self.handle_settings_command(command),
        }
    }

    fn handle_agent_command(&self, command: &AgentCommands) -> Result<String, ApiError> {
        match command {
            AgentCommands::List { format } => {
                let registry = self.agents.read();
                let result = AgentCommandService::list(&registry);
                match format.as_str() {
                    "json" => Ok(presentation::format_agent_list_result_json(&result)),
                    _ => Ok(presentation::format_agent_list_result_text(&result)),
                }
            }
            AgentCommands::Show {
                agent_id,
                format,
                include_documents,
            } => {
                let registry = self.agents.read();
                let result = AgentCommandService::show(&registry, agent_id)?;
                match format.as_str() {
                    "json" => Ok(presentation::format_agent_show_result_json(&result)),
                    _ => Ok(presentation::format_agent_show_result_text(
                        &result,
                        *include_documents,
                    )),
                }
            }
            AgentCommands::Validate {
                agent_id,
                all,
                verbose,
            } => self.handle_agent_validate(agent_id.as_deref(), *all, *verbose),
            AgentCommands::Create {
                id,
                name,
                provider,
                model,
                persona,
                prompt,
                docs,
                docs_dir,
                force,
                non_interactive,
            } => {
                let prompting = self.interactive && !*non_interactive;
                let request = AgentCreateRequest {
                    agent_id: id.clone(),
                    name: self.required(name.as_deref(), "Agent name", "--name", prompting)?,
                    provider: self.required(
                        provider.as_deref(),
                        "Provider (groq, openai, ollama, anthropic, openrouter)",
                        "--provider",
                        prompting,
                    )?,
                    model: self.required(model.as_deref(), "Model", "--model", prompting)?,
                    persona: persona.clone(),
                    message_prompt: self.required(
                        prompt.as_deref(),
                        "Message prompt",
                        "--prompt",
                        prompting,
                    )?,
                    documents: docs.clone(),
                    docs_dir: docs_dir.clone(),
                    force: *force,
                };
                let mut registry = self.agents.write();
                let result = AgentCommandService::create(&mut registry, request)?;
                Ok(presentation::format_agent_save_result("created", &result))
            }
            AgentCommands::Edit {
                agent_id,
                name,
                provider,
                model,
                persona,
                prompt,
                docs,
                docs_dir,
                clear_docs,
            } => {
                let request = AgentEditRequest {
                    name: name.clone(),
                    provider: provider.clone(),
                    model: model.clone(),
                    persona: persona.clone(),
                    message_prompt: prompt.clone(),
                    add_documents: docs.clone(),
                    docs_dir: docs_dir.clone(),
                    clear_documents: *clear_docs,
                };
                let mut registry = self.agents.write();
                let result = AgentCommandService::edit(&mut registry, agent_id, request)?;
                Ok(presentation::format_agent_save_result("updated", &result))
            }
            AgentCommands::Remove { agent_id, yes } => {
                if !*yes && !self.confirm(&format!("Remove agent '{}'?", agent_id))? {
                    return Ok("Removal cancelled.".to_string());
                }
                let mut registry = self.agents.write();
                let result = AgentCommandService::remove(&mut registry, agent_id)?;
                Ok(presentation::format_agent_remove_result(&result))
            }
        }
    }

    fn handle_agent_validate(
        &self,
        agent_id: Option<&str>,
        all: bool,
        verbose: bool,
    ) -> Result<String, ApiError> {
        let registry = self.agents.read();
        if all {
            let result = AgentCommandService::validate_all(&registry, &self.config.providers);
            if result.results.is_empty() {
                return Ok("No agents found to validate.".to_string());
            }
            Ok(presentation::format_validation_results_all(
                &result.results,
                verbose,
            ))
        } else {
            let id = agent_id.ok_or_else(|| {
                ApiError::ConfigError("Agent ID required unless --all is specified".to_string())
            })?;
            let result =
                AgentCommandService::validate_single(&registry, id, &self.config.providers)?;
            Ok(presentation::format_validation_result(&result, verbose))
        }
    }

    /// Build the campaign request from an agent or inline flags.
    pub fn campaign_request(&self, args: &CampaignRunArgs) -> Result<CampaignRequest, ApiError> {
        let mut destinations = Vec::new();
        for value in &args.to {
            destinations.extend(parse_destinations(value));
        }
        if let Some(path) = &args.numbers_file {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ApiError::InvalidCampaign(format!(
                    "Failed to read numbers file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            destinations.extend(parse_destinations(&content));
        }

        let language = args
            .language
            .clone()
            .unwrap_or_else(|| self.config.campaign.default_language.clone());

        let mut request = match &args.agent {
            Some(agent_id) => {
                let registry = self.agents.read();
                let template = registry.get_or_error(agent_id)?;
                CampaignRequest::from_agent(template, destinations, language)
            }
            None => CampaignRequest {
                destinations,
                provider: args.provider.clone().unwrap_or_default(),
                model: args.model.clone().unwrap_or_default(),
                persona: args.persona.clone(),
                instruction: args.prompt.clone().unwrap_or_default(),
                documents: Vec::new(),
                language,
            },
        };

        let extra = AgentCommandService::gather_documents(&args.docs, args.docs_dir.as_ref())?;
        for (path, reason) in &extra.skipped {
            info!(path = %path.display(), reason = %reason, "Skipped knowledge document");
        }
        request.documents.extend(extra.documents);
        Ok(request)
    }

    async fn handle_campaign_run(&self, args: &CampaignRunArgs) -> Result<String, ApiError> {
        let request = self.campaign_request(args)?;

        let mut sequencer_config = SequencerConfig::from(&self.config.campaign);
        if let Some(pace_ms) = args.pace_ms {
            sequencer_config.pace = std::time::Duration::from_millis(pace_ms);
        }

        let launcher = CampaignLauncher::new(sequencer_config, self.history.clone());
        let mut run = launcher.launch(request, &self.config.providers, &self.config.gateway)?;

        let json = args.format == "json";
        let color = !json && presentation::use_color();
        while let Some(event) = run.next().await {
            if json {
                continue;
            }
            if let Some(line) = presentation::format_campaign_event(&event, color) {
                println!("{}", line);
            }
            if let CampaignEvent::Completed(report) = &event {
                debug!(sent = report.summary.sent, "Campaign completion received");
            }
        }

        let report = run.wait().await?;
        if json {
            Ok(presentation::format_campaign_report_json(&report))
        } else {
            Ok(presentation::format_campaign_report_text(&report, color))
        }
    }

    fn handle_history_command(&self, command: &HistoryCommands) -> Result<String, ApiError> {
        match command {
            HistoryCommands::List {
                limit,
                status,
                search,
                format,
            } => {
                let filter = HistoryFilter {
                    query: search.clone(),
                    status: status
                        .as_deref()
                        .map(str::parse::<DeliveryStatus>)
                        .transpose()?,
                    limit: *limit,
                };
                let records = self.history.search(&filter)?;
                match format.as_str() {
                    "json" => Ok(presentation::format_history_list_json(&records)),
                    _ => Ok(presentation::format_history_list_text(
                        &records,
                        presentation::use_color(),
                    )),
                }
            }
            HistoryCommands::Stats { format } => {
                let stats = self.history.stats()?;
                let backend = self.history.backend_name();
                match format.as_str() {
                    "json" => Ok(presentation::format_history_stats_json(&stats, backend)),
                    _ => Ok(presentation::format_history_stats_text(&stats, backend)),
                }
            }
            HistoryCommands::Clear { yes } => {
                if !*yes && !self.confirm("Delete all history records?")? {
                    return Ok("Clear cancelled.".to_string());
                }
                let removed = self.history.clear()?;
                info!(removed, backend = self.history.backend_name(), "History cleared");
                Ok(presentation::format_history_clear_result(removed))
            }
        }
    }

    async fn handle_provider_command(&self, command: &ProviderCommands) -> Result<String, ApiError> {
        match command {
            ProviderCommands::List { format } => {
                let result = ProviderCommandService::run_list(&self.config.providers);
                match format.as_str() {
                    "json" => Ok(presentation::format_provider_list_result_json(&result)),
                    _ => Ok(presentation::format_provider_list_result_text(
                        &result,
                        presentation::use_color(),
                    )),
                }
            }
            ProviderCommands::Models { provider, format } => {
                let result =
                    ProviderCommandService::run_models(&self.config.providers, provider).await?;
                match format.as_str() {
                    "json" => Ok(presentation::format_provider_models_json(&result)),
                    _ => Ok(presentation::format_provider_models_text(&result)),
                }
            }
        }
    }

    fn handle_settings_command(&self, command: &SettingsCommands) -> Result<String, ApiError> {
        match command {
            SettingsCommands::Show { format } => {
                let result = self.settings.show()?;
                match format.as_str() {
                    "json" => Ok(presentation::format_settings_show_json(&result)),
                    _ => Ok(presentation::format_settings_show_text(&result)),
                }
            }
            SettingsCommands::Set { key, value } => {
                let change = self.settings.set(key, value)?;
                Ok(presentation::format_setting_change(&change))
            }
            SettingsCommands::Unset { key } => {
                let change = self.settings.unset(key)?;
                Ok(presentation::format_setting_change(&change))
            }
        }
    }

    /// Use the flag value, or prompt for it when interactive.
    fn required(
        &self,
        value: Option<&str>,
        prompt: &str,
        flag: &str,
        prompting: bool,
    ) -> Result<String, ApiError> {
        if let Some(v) = value {
            return Ok(v.to_string());
        }
        if !prompting {
            return Err(ApiError::ConfigError(format!("{} is required. Use {}", prompt, flag)));
        }
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
    }

    /// Destructive actions need `--yes` when prompts are disabled.
    fn confirm(&self, prompt: &str) -> Result<bool, ApiError> {
        if !self.interactive {
            return Err(ApiError::ConfigError(
                "Confirmation required; pass --yes".to_string(),
            ));
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
    }
}
