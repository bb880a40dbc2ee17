//! Shared test utilities for integration tests
//!
//! Centralized XDG isolation plus scripted collaborators for campaign runs.

use async_trait::async_trait;
use parking_lot::Mutex as PlMutex;
use smsagent::error::ApiError;
use smsagent::gateway::{DeliveryGateway, DeliveryReceipt};
use smsagent::provider::{ChatMessage, CompletionOptions, CompletionResponse, ModelProviderClient, TokenUsage};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 3] = ["HOME", "XDG_CONFIG_HOME", "XDG_DATA_HOME"];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            saved: names
                .into_iter()
                .map(|n| (n.to_string(), std::env::var(n).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(v) => std::env::set_var(&name, v),
                None => std::env::remove_var(&name),
            }
        }
    }
}

/// Set up isolated XDG directories for a test with automatic cleanup
///
/// XDG_CONFIG_HOME is the temp dir itself, XDG_DATA_HOME is `<temp>/data` and HOME
/// is `<temp>/home`. The original environment is restored afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    with_env(test_dir, &[], f)
}

/// Like [`with_xdg_env`], additionally setting `vars` for the duration of `f`.
pub fn with_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state =
        EnvState::capture(ISOLATED_VARS.into_iter().chain(vars.iter().map(|(k, _)| *k)));

    let test_config_home = test_dir.path().to_path_buf();
    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_data_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    std::env::set_var("XDG_DATA_HOME", &test_data_home);
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let result = f();

    env_state.restore();
    result
}

/// One scripted generation outcome.
#[derive(Debug, Clone)]
pub enum Outcome {
    Text(String),
    Fail(String),
    Panic(String),
}

/// Generator that replays a script per call, repeating the last entry.
pub struct ScriptedGenerator {
    script: Vec<Outcome>,
    calls: PlMutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script,
            calls: PlMutex::new(Vec::new()),
        }
    }

    pub fn always(text: &str) -> Self {
        Self::new(vec![Outcome::Text(text.to_string())])
    }

    /// User prompts seen, in call order.
    pub fn user_prompts(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ModelProviderClient for ScriptedGenerator {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        _options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        tokio::task::yield_now().await;
        let index = {
            let mut calls = self.calls.lock();
            calls.push(messages.last().map(|m| m.content.clone()).unwrap_or_default());
            calls.len() - 1
        };
        let content = match self.script.get(index).or_else(|| self.script.last()) {
            Some(Outcome::Text(t)) => t.clone(),
            Some(Outcome::Fail(e)) => return Err(ApiError::ProviderRequestFailed(e.clone())),
            Some(Outcome::Panic(m)) => panic!("{}", m),
            None => String::new(),
        };
        Ok(CompletionResponse {
            content,
            model: "scripted".to_string(),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["scripted".to_string()])
    }
}

/// Gateway that records sends and fails for listed addresses.
#[derive(Default)]
pub struct RecordingGateway {
    pub fail_for: Vec<String>,
    sent: PlMutex<Vec<(String, String)>>,
}

impl RecordingGateway {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            fail_for: addresses.iter().map(|s| s.to_string()).collect(),
            sent: PlMutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl DeliveryGateway for RecordingGateway {
    async fn send(&self, to: &str, body: &str) -> DeliveryReceipt {
        let mut sent = self.sent.lock();
        sent.push((to.to_string(), body.to_string()));
        if self.fail_for.iter().any(|a| a == to) {
            DeliveryReceipt::failed("Invalid 'To' Phone Number")
        } else {
            DeliveryReceipt::sent(format!("SM{:04}", sent.len()), Some("queued".to_string()))
        }
    }

    fn gateway_name(&self) -> &str {
        "recording"
    }
}
