//! Campaign runs end to end through the public launcher, with scripted collaborators.

use crate::integration::test_utils::{Outcome, RecordingGateway, ScriptedGenerator};
use futures::StreamExt;
use smsagent::agent::{AgentTemplate, KnowledgeDocument, Persona};
use smsagent::campaign::{
    CampaignEvent, CampaignLauncher, CampaignRequest, CampaignSequencer, CampaignSpec,
    ItemStatus, SequencerConfig, StepOutcome,
};
use smsagent::gateway::GatewayCredentials;
use smsagent::history::{
    DeliveryStatus, HistoryRecorder, HistoryStore, JsonlHistoryStore, MemoryHistoryStore,
};
use smsagent::provider::{ProviderCredentials, ProviderKind};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn providers() -> ProviderCredentials {
    ProviderCredentials {
        openai_api_key: "sk-test".to_string(),
        ..ProviderCredentials::default()
    }
}

fn gateway_credentials() -> GatewayCredentials {
    GatewayCredentials {
        account_sid: "AC00000000000000000000000000000000".to_string(),
        auth_token: "token".to_string(),
        from_number: "+15005550006".to_string(),
        base_url: None,
    }
}

fn request(destinations: &[&str]) -> CampaignRequest {
    CampaignRequest {
        destinations: destinations.iter().map(|s| s.to_string()).collect(),
        provider: "openai".to_string(),
        model: "gpt-4o-mini".to_string(),
        persona: Some("support".to_string()),
        instruction: "Remind the customer about tomorrow's appointment".to_string(),
        documents: Vec::new(),
        language: "English".to_string(),
    }
}

fn spec(destinations: &[&str]) -> CampaignSpec {
    CampaignSpec::validate(request(destinations), &providers(), &gateway_credentials()).unwrap()
}

#[tokio::test]
async fn test_three_numbers_all_sent() {
    let history = Arc::new(MemoryHistoryStore::new());
    let generator = Arc::new(ScriptedGenerator::always("Hi there"));
    let gateway = Arc::new(RecordingGateway::default());

    let run = CampaignLauncher::new(SequencerConfig::immediate(), history.clone()).launch_with(
        spec(&["A", "B", "C"]),
        generator.clone(),
        gateway.clone(),
    );
    let report = run.wait().await.unwrap();

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.sent, 3);
    assert!(report
        .items
        .iter()
        .all(|i| i.status == ItemStatus::Sent && i.generated_text == "Hi there"));

    let records = history.snapshot();
    assert_eq!(records.len(), 3);
    let addresses: Vec<_> = records.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, vec!["A", "B", "C"]);
    assert!(records.iter().all(|r| r.status == DeliveryStatus::Sent));
    assert!(records.iter().all(|r| r.language == "english"));

    assert_eq!(
        generator.user_prompts(),
        vec![
            "Generate an SMS message for phone number A in english.",
            "Generate an SMS message for phone number B in english.",
            "Generate an SMS message for phone number C in english.",
        ]
    );
    assert_eq!(gateway.sent().len(), 3);
}

#[tokio::test]
async fn test_mixed_outcomes_are_isolated_per_item() {
    let history = Arc::new(MemoryHistoryStore::new());
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Outcome::Fail("rate limited".to_string()),
        Outcome::Text("   ".to_string()),
        Outcome::Text("Your visit is at 10am".to_string()),
        Outcome::Panic("tokenizer crashed".to_string()),
        Outcome::Text("See you soon".to_string()),
    ]));
    let gateway = Arc::new(RecordingGateway::failing_for(&["bad"]));

    let run = CampaignLauncher::new(SequencerConfig::immediate(), history.clone()).launch_with(
        spec(&["A", "B", "bad", "D", "E"]),
        generator,
        gateway.clone(),
    );
    let report = run.wait().await.unwrap();

    let errors: Vec<_> = report.items.iter().map(|i| i.error.as_deref()).collect();
    assert_eq!(
        errors,
        vec![
            Some("rate limited"),
            Some("AI generated empty message"),
            Some("Invalid 'To' Phone Number"),
            Some("tokenizer crashed"),
            None,
        ]
    );
    assert_eq!(report.items[2].generated_text, "Your visit is at 10am");
    assert_eq!(report.summary.sent, 1);
    assert_eq!(report.summary.failed, 4);

    // Only "bad" and "E" reach the gateway.
    let sent: Vec<_> = gateway.sent().into_iter().map(|(to, _)| to).collect();
    assert_eq!(sent, vec!["bad", "E"]);

    let records = history.snapshot();
    assert_eq!(records.len(), 5);
    assert_eq!(records[0].text, "");
    assert_eq!(records[2].text, "Your visit is at 10am");
    assert_eq!(records[2].status, DeliveryStatus::Failed);
    assert_eq!(records[4].status, DeliveryStatus::Sent);
    assert!(records[4].message_id.is_some());
}

#[tokio::test]
async fn test_events_stream_and_completion_once() {
    let history = Arc::new(MemoryHistoryStore::new());
    let mut run = CampaignLauncher::new(SequencerConfig::immediate(), history).launch_with(
        spec(&["A", "B"]),
        Arc::new(ScriptedGenerator::always("Hello")),
        Arc::new(RecordingGateway::default()),
    );

    let mut events = Vec::new();
    while let Some(event) = run.next().await {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(CampaignEvent::Started { total: 2 })));
    let completions = events
        .iter()
        .filter(|e| matches!(e, CampaignEvent::Completed(_)))
        .count();
    assert_eq!(completions, 1);
    assert!(matches!(events.last(), Some(CampaignEvent::Completed(_))));

    for event in &events {
        if let CampaignEvent::Updated(snapshot) = event {
            assert!(snapshot.summary.processing <= 1);
            assert_eq!(snapshot.summary.total, 2);
        }
    }
    assert_eq!(run.wait().await.unwrap().summary.sent, 2);
}

#[tokio::test]
async fn test_duplicate_step_requests_do_not_duplicate_work() {
    let history = Arc::new(MemoryHistoryStore::new());
    let sequencer = CampaignSequencer::new(
        spec(&["A", "B"]),
        Arc::new(ScriptedGenerator::always("Hello")),
        Arc::new(RecordingGateway::default()),
        HistoryRecorder::new(history.clone()),
        SequencerConfig::immediate(),
    );

    let (a, b, c) = tokio::join!(sequencer.step(), sequencer.step(), sequencer.step());
    let processed = [a, b, c]
        .iter()
        .filter(|o| matches!(o, StepOutcome::Processed { .. }))
        .count();
    assert_eq!(processed, 1);
    assert_eq!(history.len(), 1);
    assert_eq!(sequencer.cursor(), 1);
}

#[tokio::test]
async fn test_pacing_applies_after_every_item() {
    let history = Arc::new(MemoryHistoryStore::new());
    let config = SequencerConfig {
        pace: Duration::from_millis(40),
        settle: Duration::from_millis(20),
        ..SequencerConfig::immediate()
    };
    let run = CampaignLauncher::new(config, history).launch_with(
        spec(&["A", "B", "C"]),
        Arc::new(ScriptedGenerator::new(vec![
            Outcome::Text("ok".to_string()),
            Outcome::Fail("boom".to_string()),
            Outcome::Text("ok".to_string()),
        ])),
        Arc::new(RecordingGateway::default()),
    );

    let started = Instant::now();
    let report = run.wait().await.unwrap();
    // Three paced items (including the failed one) plus the settle delay.
    assert!(started.elapsed() >= Duration::from_millis(140));
    assert_eq!(report.summary.failed, 1);
}

#[tokio::test]
async fn test_launch_validation_blocks_everything() {
    let history = Arc::new(MemoryHistoryStore::new());
    let launcher = CampaignLauncher::new(SequencerConfig::immediate(), history.clone());

    let mut bad_provider = request(&["A"]);
    bad_provider.provider = "foo".to_string();
    assert!(launcher
        .launch(bad_provider, &providers(), &gateway_credentials())
        .is_err());

    assert!(launcher
        .launch(request(&["A"]), &ProviderCredentials::default(), &gateway_credentials())
        .is_err());

    assert!(launcher
        .launch(request(&[]), &providers(), &gateway_credentials())
        .is_err());

    assert!(history.is_empty());
}

#[test]
fn test_agent_documents_reach_the_system_prompt() {
    let mut template = AgentTemplate::new(
        "clinic",
        "Clinic reminders",
        ProviderKind::OpenAI,
        "gpt-4o-mini",
        "Remind patients of their appointment",
    );
    template.persona = Persona::Support;
    template
        .documents
        .push(KnowledgeDocument::new("hours.txt", "Open 9-5 weekdays"));

    let request = CampaignRequest::from_agent(&template, vec!["+15550001".to_string()], "hindi");
    let spec = CampaignSpec::validate(request, &providers(), &gateway_credentials()).unwrap();
    assert_eq!(spec.documents.len(), 1);
    assert_eq!(spec.persona, Persona::Support);

    let system = smsagent::campaign::render_system_prompt(
        spec.persona,
        &spec.instruction,
        &spec.documents,
    );
    assert!(system.contains("Document 1: hours.txt\nOpen 9-5 weekdays"));
}

#[tokio::test]
async fn test_file_history_survives_a_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(JsonlHistoryStore::new(dir.path().join("history.jsonl")));
    let run = CampaignLauncher::new(SequencerConfig::immediate(), store.clone()).launch_with(
        spec(&["A", "B"]),
        Arc::new(ScriptedGenerator::always("Hello")),
        Arc::new(RecordingGateway::failing_for(&["B"])),
    );
    run.wait().await.unwrap();

    let reopened = JsonlHistoryStore::new(dir.path().join("history.jsonl"));
    let records = reopened.list().unwrap();
    assert_eq!(records.len(), 2);
    // Newest first.
    assert_eq!(records[0].address, "B");
    assert_eq!(records[0].status, DeliveryStatus::Failed);
    assert_eq!(reopened.stats().unwrap().sent, 1);
}
