//! Agent Templates
//!
//! An agent is a saved generation configuration: provider, model, persona, message
//! prompt and optional knowledge documents. Campaigns can be launched straight from one.

pub mod commands;
pub mod documents;
pub mod persona;
pub mod registry;
pub mod storage;
pub mod template;

pub use commands::{AgentCommandService, AgentCreateRequest, AgentEditRequest};
pub use persona::Persona;
pub use registry::{AgentRegistry, ValidationResult};
pub use storage::{AgentStorage, StoredAgent, XdgAgentStorage};
pub use template::{AgentTemplate, KnowledgeDocument};
