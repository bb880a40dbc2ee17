use crate::error::ApiError;
use crate::provider::{ProviderCredentials, ProviderFactory, ProviderKind};
use serde::{Deserialize, Serialize};

pub struct ProviderCommandService;

/// One row of `provider list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatusEntry {
    pub provider: String,
    pub display_name: String,
    pub configured: bool,
    pub credential: String,
    pub base_url: String,
}

/// Result of provider list command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderListResult {
    pub providers: Vec<ProviderStatusEntry>,
}

/// Result of provider models command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderModelsResult {
    pub provider: String,
    pub models: Vec<String>,
}

impl ProviderCommandService {
    /// List every supported provider with its configured status.
    pub fn run_list(credentials: &ProviderCredentials) -> ProviderListResult {
        let providers = ProviderKind::ALL
            .into_iter()
            .map(|kind| ProviderStatusEntry {
                provider: kind.as_str().to_string(),
                display_name: kind.display_name().to_string(),
                configured: credentials.is_configured(kind),
                credential: credentials.masked(kind),
                base_url: credentials.base_url(kind),
            })
            .collect();
        ProviderListResult { providers }
    }

    /// Ask the provider which models it serves.
    pub async fn run_models(
        credentials: &ProviderCredentials,
        provider: &str,
    ) -> Result<ProviderModelsResult, ApiError> {
        let kind: ProviderKind = provider.parse()?;
        // Model name is irrelevant for listing
        let client = ProviderFactory::create_client(kind, "", credentials)?;
        let mut models = client.list_models().await?;
        models.sort();
        Ok(ProviderModelsResult {
            provider: kind.as_str().to_string(),
            models,
        })
    }
}
