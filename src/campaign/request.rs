//! Campaign request (raw input) and the validated, immutable spec a run executes.

use crate::agent::{AgentTemplate, KnowledgeDocument, Persona};
use crate::error::ApiError;
use crate::gateway::GatewayCredentials;
use crate::provider::{ProviderCredentials, ProviderKind};
use serde::{Deserialize, Serialize};

/// Languages offered by the CLI prompt; any non-blank tag is accepted.
pub const KNOWN_LANGUAGES: [&str; 3] = ["english", "hindi", "arabic"];

/// Unvalidated campaign input, as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub destinations: Vec<String>,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub persona: Option<String>,
    pub instruction: String,
    #[serde(default)]
    pub documents: Vec<KnowledgeDocument>,
    pub language: String,
}

impl CampaignRequest {
    /// Request carrying a saved template's generation settings.
    pub fn from_agent(
        template: &AgentTemplate,
        destinations: Vec<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            destinations,
            provider: template.provider.as_str().to_string(),
            model: template.model.clone(),
            persona: Some(template.persona.as_str().to_string()),
            instruction: template.message_prompt.clone(),
            documents: template.documents.clone(),
            language: language.into(),
        }
    }
}

/// Everything a run needs, checked once at launch.
#[derive(Debug, Clone)]
pub struct CampaignSpec {
    pub destinations: Vec<String>,
    pub provider: ProviderKind,
    pub model: String,
    pub persona: Persona,
    pub instruction: String,
    pub documents: Vec<KnowledgeDocument>,
    pub language: String,
    pub provider_credentials: ProviderCredentials,
    pub gateway_credentials: GatewayCredentials,
}

impl CampaignSpec {
    /// Launch validation. Nothing is generated, sent or recorded when this fails.
    pub fn validate(
        request: CampaignRequest,
        providers: &ProviderCredentials,
        gateway: &GatewayCredentials,
    ) -> Result<Self, ApiError> {
        let provider: ProviderKind = request.provider.parse()?;

        if request.destinations.is_empty() {
            return Err(ApiError::InvalidCampaign(
                "at least one destination is required".to_string(),
            ));
        }
        let mut destinations = Vec::with_capacity(request.destinations.len());
        for (index, address) in request.destinations.iter().enumerate() {
            let address = address.trim();
            if address.is_empty() {
                return Err(ApiError::InvalidCampaign(format!(
                    "destination {} is empty",
                    index + 1
                )));
            }
            destinations.push(address.to_string());
        }

        let model = request.model.trim();
        if model.is_empty() {
            return Err(ApiError::InvalidCampaign("model cannot be empty".to_string()));
        }
        let instruction = request.instruction.trim();
        if instruction.is_empty() {
            return Err(ApiError::InvalidCampaign(
                "message prompt cannot be empty".to_string(),
            ));
        }
        let language = request.language.trim().to_lowercase();
        if language.is_empty() {
            return Err(ApiError::InvalidCampaign("language cannot be empty".to_string()));
        }

        providers.require(provider)?;
        gateway.validate()?;

        Ok(Self {
            destinations,
            provider,
            model: model.to_string(),
            persona: request
                .persona
                .as_deref()
                .map(Persona::from_tag)
                .unwrap_or_default(),
            instruction: instruction.to_string(),
            documents: request.documents,
            language,
            provider_credentials: providers.clone(),
            gateway_credentials: gateway.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Split pasted numbers on newlines and commas; order and duplicates are kept.
pub fn parse_destinations(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
