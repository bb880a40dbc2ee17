//! smsagent: AI-generated SMS campaigns
//!
//! Saved agent templates pair a generation provider and model with a persona,
//! a message prompt and optional knowledge documents. A campaign generates one
//! message per destination, delivers it through a messaging gateway, records the
//! outcome in history and paces itself between items.

pub mod agent;
pub mod campaign;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod logging;
pub mod provider;
pub mod settings;
