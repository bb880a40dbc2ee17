//! Integration tests for agent templates: XDG storage, the command service and CLI routing

use clap::Parser;
use smsagent::agent::{
    AgentCommandService, AgentCreateRequest, AgentEditRequest, AgentRegistry, AgentStorage,
    Persona, XdgAgentStorage,
};
use smsagent::cli::{AgentCommands, Cli, Commands, RunContext};
use smsagent::config::{xdg, AppConfig};
use smsagent::error::ApiError;
use smsagent::history::MemoryHistoryStore;
use smsagent::provider::{ProviderCredentials, ProviderKind};
use smsagent::settings::SettingsService;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use crate::integration::with_xdg_env;

fn create_request(name: &str) -> AgentCreateRequest {
    AgentCreateRequest {
        name: name.to_string(),
        provider: "groq".to_string(),
        model: "llama3-8b-8192".to_string(),
        persona: Some("sales".to_string()),
        message_prompt: "Announce the spring sale".to_string(),
        ..AgentCreateRequest::default()
    }
}

fn context(dir: &TempDir) -> RunContext {
    let agents = AgentRegistry::with_storage(Arc::new(XdgAgentStorage::with_dir(
        dir.path().join("agents"),
    )));
    RunContext::from_parts(
        dir.path().to_path_buf(),
        AppConfig::default(),
        agents,
        Arc::new(MemoryHistoryStore::new()),
        SettingsService::new(dir.path().join("config.toml")),
    )
}

fn parse(args: &[&str]) -> Commands {
    let mut full = vec!["smsagent"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap().command
}

#[test]
fn test_templates_live_under_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let mut registry = AgentRegistry::new();
        let result = AgentCommandService::create(&mut registry, create_request("Spring Sale"))
            .unwrap();

        assert_eq!(result.agent_id, "spring-sale");
        let expected = xdg::agents_dir().unwrap().join("spring-sale.toml");
        assert_eq!(result.path, expected);
        assert!(expected.starts_with(test_dir.path().join("smsagent")));

        let mut reloaded = AgentRegistry::new();
        reloaded.load().unwrap();
        let template = reloaded.get("spring-sale").unwrap();
        assert_eq!(template.provider, ProviderKind::Groq);
        assert_eq!(template.persona, Persona::Sales);
        assert_eq!(template.message_prompt, "Announce the spring sale");
    });
}

#[test]
fn test_create_refuses_duplicates_unless_forced() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(XdgAgentStorage::with_dir(dir.path().join("agents")));
    let mut registry = AgentRegistry::with_storage(storage.clone());

    AgentCommandService::create(&mut registry, create_request("Promo")).unwrap();
    let err = AgentCommandService::create(&mut registry, create_request("Promo")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidAgent(_)));

    let mut forced = create_request("Promo");
    forced.model = "llama3-70b-8192".to_string();
    forced.force = true;
    AgentCommandService::create(&mut registry, forced).unwrap();

    let stored = storage.list().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].template.model, "llama3-70b-8192");
}

#[test]
fn test_documents_from_files_and_directory() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("nested")).unwrap();
    fs::write(docs.join("a-faq.txt"), "Returns within 30 days").unwrap();
    fs::write(docs.join("nested").join("b-terms.pdf"), "%PDF terms").unwrap();
    fs::write(docs.join("image.png"), [0u8, 1, 2]).unwrap();
    let extra = dir.path().join("hours.txt");
    fs::write(&extra, "Open 9-5").unwrap();
    let rejected = dir.path().join("notes.md");
    fs::write(&rejected, "# notes").unwrap();

    let mut registry =
        AgentRegistry::with_storage(Arc::new(XdgAgentStorage::with_dir(dir.path().join("agents"))));
    let mut request = create_request("Support bot");
    request.documents = vec![extra, rejected.clone()];
    request.docs_dir = Some(docs);

    let result = AgentCommandService::create(&mut registry, request).unwrap();
    assert_eq!(result.documents, 3);
    assert_eq!(result.skipped_documents.len(), 1);
    assert_eq!(result.skipped_documents[0].0, rejected);

    let template = registry.get("support-bot").unwrap();
    let names: Vec<_> = template.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["hours.txt", "a-faq.txt", "b-terms.pdf"]);
    assert_eq!(template.documents[1].content, "Returns within 30 days");
}

#[test]
fn test_edit_changes_only_given_fields() {
    let dir = TempDir::new().unwrap();
    let mut registry =
        AgentRegistry::with_storage(Arc::new(XdgAgentStorage::with_dir(dir.path().join("agents"))));
    AgentCommandService::create(&mut registry, create_request("Promo")).unwrap();
    let created_at = registry.get("promo").unwrap().created_at;

    AgentCommandService::edit(
        &mut registry,
        "promo",
        AgentEditRequest {
            provider: Some("anthropic".to_string()),
            model: Some("claude-3-haiku-20240307".to_string()),
            ..AgentEditRequest::default()
        },
    )
    .unwrap();

    let template = registry.get("promo").unwrap();
    assert_eq!(template.provider, ProviderKind::Anthropic);
    assert_eq!(template.name, "Promo");
    assert_eq!(template.persona, Persona::Sales);
    assert_eq!(template.created_at, created_at);

    let err = AgentCommandService::edit(
        &mut registry,
        "promo",
        AgentEditRequest {
            message_prompt: Some("   ".to_string()),
            ..AgentEditRequest::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidAgent(_)));
    assert_eq!(
        registry.get("promo").unwrap().message_prompt,
        "Announce the spring sale"
    );
}

#[test]
fn test_validate_reports_missing_credentials() {
    let dir = TempDir::new().unwrap();
    let mut registry =
        AgentRegistry::with_storage(Arc::new(XdgAgentStorage::with_dir(dir.path().join("agents"))));
    AgentCommandService::create(&mut registry, create_request("Promo")).unwrap();

    let missing = AgentCommandService::validate_single(
        &registry,
        "promo",
        &ProviderCredentials::default(),
    )
    .unwrap();
    assert!(!missing.is_valid());
    assert!(missing.errors[0].contains("GROQ_API_KEY"));

    let configured = ProviderCredentials {
        groq_api_key: "gsk-test".to_string(),
        ..ProviderCredentials::default()
    };
    let all = AgentCommandService::validate_all(&registry, &configured);
    assert_eq!(all.results.len(), 1);
    assert!(all.results[0].1.is_valid());
}

#[tokio::test]
async fn test_cli_create_show_remove() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let output = ctx
        .execute(&parse(&[
            "agent",
            "create",
            "--name",
            "Clinic",
            "--provider",
            "openai",
            "--model",
            "gpt-4o-mini",
            "--prompt",
            "Confirm tomorrow's appointment",
            "--non-interactive",
        ]))
        .await
        .unwrap();
    assert!(output.contains("Agent created: clinic"));

    let json = ctx
        .execute(&parse(&["agent", "show", "clinic", "--format", "json"]))
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["agent"]["model"], "gpt-4o-mini");

    // Non-interactive removal needs --yes.
    let err = ctx
        .execute(&parse(&["agent", "remove", "clinic"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--yes"));

    let removed = ctx
        .execute(&parse(&["agent", "remove", "clinic", "--yes"]))
        .await
        .unwrap();
    assert!(removed.contains("Removed agent: clinic"));
    assert!(!dir.path().join("agents").join("clinic.toml").exists());
}

#[tokio::test]
async fn test_cli_create_without_prompting_reports_missing_flag() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    let command = parse(&["agent", "create", "--name", "Clinic", "--non-interactive"]);
    assert!(matches!(
        &command,
        Commands::Agent {
            command: AgentCommands::Create { .. }
        }
    ));

    let err = ctx.execute(&command).await.unwrap_err();
    assert!(err.to_string().contains("--provider"));
}
