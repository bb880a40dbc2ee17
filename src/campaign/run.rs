//! Launching a campaign on a background worker and observing it.

use crate::campaign::request::{CampaignRequest, CampaignSpec};
use crate::campaign::sequencer::{
    CampaignEvent, CampaignReport, CampaignSequencer, SequencerConfig,
};
use crate::error::ApiError;
use crate::gateway::{DeliveryGateway, GatewayCredentials, TwilioGateway};
use crate::history::{HistoryRecorder, HistoryStore};
use crate::provider::{ModelProviderClient, ProviderCredentials, ProviderFactory};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

pub struct CampaignLauncher {
    config: SequencerConfig,
    history: Arc<dyn HistoryStore>,
}

impl CampaignLauncher {
    pub fn new(config: SequencerConfig, history: Arc<dyn HistoryStore>) -> Self {
        Self { config, history }
    }

    /// Validate `request`, build the provider client and Twilio gateway, and start.
    ///
    /// Configuration errors are returned before anything is generated or sent.
    pub fn launch(
        &self,
        request: CampaignRequest,
        providers: &ProviderCredentials,
        gateway: &GatewayCredentials,
    ) -> Result<CampaignRun, ApiError> {
        let spec = CampaignSpec::validate(request, providers, gateway)?;
        let generator =
            ProviderFactory::create_client(spec.provider, &spec.model, &spec.provider_credentials)?;
        let gateway: Arc<dyn DeliveryGateway> =
            Arc::new(TwilioGateway::new(spec.gateway_credentials.clone())?);
        Ok(self.launch_with(spec, generator, gateway))
    }

    /// Start a validated campaign with explicit collaborators.
    pub fn launch_with(
        &self,
        spec: CampaignSpec,
        generator: Arc<dyn ModelProviderClient>,
        gateway: Arc<dyn DeliveryGateway>,
    ) -> CampaignRun {
        let total = spec.len();
        info!(
            total,
            provider = spec.provider.as_str(),
            gateway = gateway.gateway_name(),
            "Launching campaign"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let sequencer = CampaignSequencer::new(
            spec,
            generator,
            gateway,
            HistoryRecorder::new(self.history.clone()),
            self.config.clone(),
        )
        .with_events(tx);

        let handle = tokio::spawn(async move { sequencer.run_to_completion().await });
        CampaignRun {
            total,
            events: rx,
            handle,
        }
    }
}

/// Handle to a running campaign; a stream of [`CampaignEvent`]s.
///
/// The stream ends after [`CampaignEvent::Completed`].
pub struct CampaignRun {
    total: usize,
    events: mpsc::UnboundedReceiver<CampaignEvent>,
    handle: JoinHandle<CampaignReport>,
}

impl CampaignRun {
    pub fn total(&self) -> usize {
        self.total
    }

    /// Wait for the worker and return the final report.
    pub async fn wait(self) -> Result<CampaignReport, ApiError> {
        drop(self.events);
        self.handle
            .await
            .map_err(|e| ApiError::CampaignWorker(e.to_string()))
    }
}

impl Stream for CampaignRun {
    type Item = CampaignEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().events.poll_recv(cx)
    }
}
