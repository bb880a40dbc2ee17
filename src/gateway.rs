//! Message Delivery Gateway
//!
//! A gateway takes a destination address and a message body and reports whether the
//! message was accepted. Failures are values ([`DeliveryReceipt::failed`]), never errors,
//! so a campaign can record them and move on.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod twilio;

pub use twilio::TwilioGateway;

/// Outcome of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub success: bool,
    /// Gateway-assigned message identifier (Twilio SID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Gateway-reported status, e.g. `queued`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryReceipt {
    pub fn sent(identifier: impl Into<String>, status: Option<String>) -> Self {
        Self {
            success: true,
            identifier: Some(identifier.into()),
            status,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            identifier: None,
            status: None,
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Attempt delivery of `body` to `to`.
    async fn send(&self, to: &str, body: &str) -> DeliveryReceipt;

    fn gateway_name(&self) -> &str;
}

/// Gateway credentials as they appear under `[gateway]` in config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayCredentials {
    #[serde(default)]
    pub account_sid: String,

    #[serde(default)]
    pub auth_token: String,

    /// Sender address, E.164
    #[serde(default)]
    pub from_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GatewayCredentials {
    /// Every credential must be non-blank.
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing: Vec<&str> = [
            ("account_sid", &self.account_sid),
            ("auth_token", &self.auth_token),
            ("from_number", &self.from_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::DeliveryNotConfigured(format!(
                "Twilio credentials not configured (missing gateway.{})",
                missing.join(", gateway.")
            )))
        }
    }

    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    /// Fill blank fields from TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_FROM_NUMBER.
    pub fn fill_from_env(&mut self) {
        for (slot, var) in [
            (&mut self.account_sid, "TWILIO_ACCOUNT_SID"),
            (&mut self.auth_token, "TWILIO_AUTH_TOKEN"),
            (&mut self.from_number, "TWILIO_FROM_NUMBER"),
        ] {
            if !slot.trim().is_empty() {
                continue;
            }
            if let Ok(value) = std::env::var(var) {
                let value = value.trim();
                if !value.is_empty() {
                    *slot = value.to_string();
                }
            }
        }
    }
}
