//! Error types for the SMS agent campaign system.

use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to serialize record: {0}")]
    Serialization(String),

    #[error("Failed to deserialize record: {0}")]
    Deserialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Domain errors surfaced by services and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("AI generated empty message")]
    EmptyGeneration,

    #[error("Delivery gateway not configured: {0}")]
    DeliveryNotConfigured(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Invalid agent template: {0}")]
    InvalidAgent(String),

    #[error("Invalid campaign: {0}")]
    InvalidCampaign(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Campaign worker failed: {0}")]
    CampaignWorker(String),
}

impl ApiError {
    /// Message without the category prefix, as recorded against a failed item.
    pub fn detail(&self) -> String {
        match self {
            ApiError::ConfigError(msg)
            | ApiError::UnknownProvider(msg)
            | ApiError::ProviderNotConfigured(msg)
            | ApiError::ProviderError(msg)
            | ApiError::ProviderRequestFailed(msg)
            | ApiError::ProviderAuthFailed(msg)
            | ApiError::ProviderRateLimit(msg)
            | ApiError::ProviderModelNotFound(msg)
            | ApiError::DeliveryNotConfigured(msg)
            | ApiError::DeliveryFailed(msg)
            | ApiError::AgentNotFound(msg)
            | ApiError::InvalidAgent(msg)
            | ApiError::InvalidCampaign(msg)
            | ApiError::DocumentError(msg)
            | ApiError::CampaignWorker(msg) => msg.clone(),
            ApiError::EmptyGeneration | ApiError::StorageError(_) => self.to_string(),
        }
    }

    /// Launch-time errors that prevent a campaign from starting.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ApiError::ConfigError(_)
                | ApiError::UnknownProvider(_)
                | ApiError::ProviderNotConfigured(_)
                | ApiError::DeliveryNotConfigured(_)
                | ApiError::InvalidCampaign(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<sled::Error> for ApiError {
    fn from(err: sled::Error) -> Self {
        ApiError::StorageError(StorageError::from(err))
    }
}
