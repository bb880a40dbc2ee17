//! Integration tests for Model Provider Integration

use smsagent::error::ApiError;
use smsagent::provider::{
    ChatMessage, CompletionOptions, MessageRole, ProviderCommandService, ProviderCredentials,
    ProviderFactory, ProviderKind,
};

fn credentials() -> ProviderCredentials {
    ProviderCredentials {
        groq_api_key: "gsk-test-0001".to_string(),
        openai_api_key: "sk-test-0002".to_string(),
        anthropic_api_key: "sk-ant-0003".to_string(),
        openrouter_api_key: "sk-or-0004".to_string(),
        ..ProviderCredentials::default()
    }
}

#[test]
fn test_factory_builds_every_provider() {
    let creds = credentials();
    for kind in ProviderKind::ALL {
        let client = ProviderFactory::create_client(kind, "some-model", &creds).unwrap();
        assert_eq!(client.provider_name(), kind.as_str());
        assert_eq!(client.model_name(), "some-model");
    }
}

#[test]
fn test_factory_refuses_missing_key() {
    let err = ProviderFactory::create_client(
        ProviderKind::Anthropic,
        "claude-3-haiku",
        &ProviderCredentials::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::ProviderNotConfigured(_)));
    assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_ollama_needs_no_api_key() {
    let client = ProviderFactory::create_client(
        ProviderKind::Ollama,
        "llama3",
        &ProviderCredentials::default(),
    )
    .unwrap();
    assert_eq!(client.provider_name(), "ollama");
}

#[test]
fn test_unknown_provider_tag() {
    let err = "foo".parse::<ProviderKind>().unwrap_err();
    assert!(matches!(err, ApiError::UnknownProvider(ref p) if p == "foo"));
    assert_eq!("OpenRouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
}

#[test]
fn test_provider_list_reports_configuration() {
    let mut creds = credentials();
    creds.openai_api_key = String::new();

    let result = ProviderCommandService::run_list(&creds);
    assert_eq!(result.providers.len(), ProviderKind::ALL.len());

    let openai = result.providers.iter().find(|p| p.provider == "openai").unwrap();
    assert!(!openai.configured);
    assert_eq!(openai.credential, "(not set)");

    let groq = result.providers.iter().find(|p| p.provider == "groq").unwrap();
    assert!(groq.configured);
    assert_eq!(groq.credential, "****0001");
    assert_eq!(groq.base_url, "https://api.groq.com/openai/v1");
}

#[test]
fn test_chat_message_roles() {
    let system = ChatMessage::system("You are helpful.");
    let user = ChatMessage::user("Hi");
    assert_eq!(system.role, MessageRole::System);
    assert_eq!(user.role, MessageRole::User);

    let options = CompletionOptions::default();
    assert_eq!(options.temperature, Some(0.7));
    assert_eq!(options.max_tokens, Some(200));
}

#[tokio::test]
async fn test_list_models_against_unreachable_ollama() {
    let creds = ProviderCredentials {
        ollama_base_url: "http://127.0.0.1:9".to_string(),
        ..ProviderCredentials::default()
    };
    assert!(ProviderCommandService::run_models(&creds, "ollama").await.is_err());
}
