//! Integration tests for the SMS agent campaign system

mod test_utils;

pub use test_utils::{with_env, with_xdg_env};

mod agent_registry;
mod campaign_sequencer;
mod config_integration;
mod history_store;
mod model_providers;
mod settings;
