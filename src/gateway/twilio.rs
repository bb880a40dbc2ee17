//! Twilio Programmable Messaging REST gateway.

use crate::error::ApiError;
use crate::gateway::{DeliveryGateway, DeliveryReceipt, GatewayCredentials};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const TWILIO_API_BASE: &str = "https://api.twilio.com";
const TWILIO_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TwilioGateway {
    client: Client,
    credentials: GatewayCredentials,
    base_url: String,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

impl TwilioGateway {
    /// Refuses blank credentials so a misconfigured gateway never reaches the network.
    pub fn new(credentials: GatewayCredentials) -> Result<Self, ApiError> {
        credentials.validate()?;
        let client = Client::builder()
            .timeout(TWILIO_HTTP_TIMEOUT)
            .build()
            .map_err(|e| ApiError::DeliveryFailed(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = credentials
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(TWILIO_API_BASE)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl DeliveryGateway for TwilioGateway {
    async fn send(&self, to: &str, body: &str) -> DeliveryReceipt {
        let form = [
            ("To", to),
            ("From", self.credentials.from_number.as_str()),
            ("Body", body),
        ];

        let response = match self
            .client
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(address = %to, error = %e, "Twilio request failed");
                return DeliveryReceipt::failed(format!("Twilio request failed: {}", e));
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let parsed = serde_json::from_str::<TwilioErrorBody>(&text).ok();
            debug!(
                address = %to,
                http_status = status.as_u16(),
                code = ?parsed.as_ref().and_then(|b| b.code),
                "Twilio rejected message"
            );
            return DeliveryReceipt::failed(rejection_message(status, parsed));
        }

        match serde_json::from_str::<MessageResource>(&text) {
            Ok(resource) => DeliveryReceipt::sent(resource.sid, resource.status),
            Err(e) => DeliveryReceipt::failed(format!("Unreadable Twilio response: {}", e)),
        }
    }

    fn gateway_name(&self) -> &str {
        "twilio"
    }
}

/// Twilio's own message when the body carries one, else the HTTP reason.
fn rejection_message(status: StatusCode, body: Option<TwilioErrorBody>) -> String {
    match body.and_then(|b| b.message) {
        Some(message) => message,
        None => format!(
            "Twilio API error: {}",
            status.canonical_reason().unwrap_or("Failed to send SMS")
        ),
    }
}
