//! Campaign sequencer: processes destinations strictly one at a time.
//!
//! Each step claims the next queued item, generates its text, delivers it,
//! records exactly one history record, waits the pacing delay and advances.
//! A step that arrives while another is in flight is a no-op. After the last
//! item the sequencer waits the settle delay and signals completion once.

use crate::campaign::prompt::{render_system_prompt, render_user_prompt};
use crate::campaign::request::CampaignSpec;
use crate::campaign::state::{CampaignSnapshot, CampaignSummary, ItemState, ItemStatus};
use crate::config::CampaignConfig;
use crate::gateway::DeliveryGateway;
use crate::history::{DeliveryStatus, HistoryRecord, HistoryRecorder};
use crate::provider::{CompletionOptions, ModelProviderClient};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const DELIVERY_FAILED: &str = "Failed to send SMS";
const STEP_INTERRUPTED: &str = "Campaign step interrupted";

#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Delay after every item, success or failure
    pub pace: Duration,
    /// Delay between the last item and the completion signal
    pub settle: Duration,
    pub completion: CompletionOptions,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self::from(&CampaignConfig::default())
    }
}

impl From<&CampaignConfig> for SequencerConfig {
    fn from(config: &CampaignConfig) -> Self {
        Self {
            pace: config.pace(),
            settle: config.settle(),
            completion: CompletionOptions::from(config),
        }
    }
}

impl SequencerConfig {
    /// No pacing or settle delay.
    pub fn immediate() -> Self {
        Self {
            pace: Duration::ZERO,
            settle: Duration::ZERO,
            completion: CompletionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Processed { index: usize, status: ItemStatus },
    /// Another step was already running; nothing happened
    InFlight,
    /// Every item has been processed
    Exhausted,
}

/// Final result of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    pub items: Vec<ItemState>,
    pub summary: CampaignSummary,
    pub provider: String,
    pub model: String,
    pub language: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CampaignReport {
    pub fn failed_items(&self) -> impl Iterator<Item = &ItemState> {
        self.items.iter().filter(|i| i.status == ItemStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub enum CampaignEvent {
    Started { total: usize },
    /// Emitted after every item state change
    Updated(CampaignSnapshot),
    Completed(CampaignReport),
}

/// Result of processing one item, before it is applied to the item state.
struct ItemOutcome {
    text: String,
    error: Option<String>,
    message_id: Option<String>,
}

impl ItemOutcome {
    fn sent(text: String, message_id: Option<String>) -> Self {
        Self {
            text,
            error: None,
            message_id,
        }
    }

    fn failed(text: String, error: String) -> Self {
        Self {
            text,
            error: Some(error),
            message_id: None,
        }
    }

    fn status(&self) -> DeliveryStatus {
        if self.error.is_some() {
            DeliveryStatus::Failed
        } else {
            DeliveryStatus::Sent
        }
    }
}

pub struct CampaignSequencer {
    spec: CampaignSpec,
    generator: Arc<dyn ModelProviderClient>,
    gateway: Arc<dyn DeliveryGateway>,
    recorder: HistoryRecorder,
    config: SequencerConfig,
    system_prompt: String,
    items: Mutex<Vec<ItemState>>,
    cursor: AtomicUsize,
    in_flight: AtomicBool,
    completed: AtomicBool,
    events: Option<mpsc::UnboundedSender<CampaignEvent>>,
    started_at: DateTime<Utc>,
}

impl CampaignSequencer {
    pub fn new(
        spec: CampaignSpec,
        generator: Arc<dyn ModelProviderClient>,
        gateway: Arc<dyn DeliveryGateway>,
        recorder: HistoryRecorder,
        config: SequencerConfig,
    ) -> Self {
        let items = spec
            .destinations
            .iter()
            .enumerate()
            .map(|(index, address)| ItemState::new(index, address.clone()))
            .collect();
        let system_prompt = render_system_prompt(spec.persona, &spec.instruction, &spec.documents);
        Self {
            spec,
            generator,
            gateway,
            recorder,
            config,
            system_prompt,
            items: Mutex::new(items),
            cursor: AtomicUsize::new(0),
            in_flight: AtomicBool::new(false),
            completed: AtomicBool::new(false),
            events: None,
            started_at: Utc::now(),
        }
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<CampaignEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        let index = self.cursor();
        CampaignSnapshot::new(index, self.items.lock().clone())
    }

    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary::from_items(&self.items.lock())
    }

    fn emit(&self, event: CampaignEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means nobody is watching; the run continues.
            let _ = events.send(event);
        }
    }

    fn emit_snapshot(&self, index: usize) {
        if self.events.is_some() {
            let items = self.items.lock().clone();
            self.emit(CampaignEvent::Updated(CampaignSnapshot::new(index, items)));
        }
    }

    /// Claim the single in-flight slot, or `None` if a step already holds it.
    fn claim(&self) -> Option<StepGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| StepGuard {
                sequencer: self,
                claimed: None,
            })
    }

    /// Settle an item whose step was dropped before it finished.
    fn abandon(&self, index: usize) {
        let record = {
            let mut items = self.items.lock();
            match items.get_mut(index) {
                Some(item) if item.status == ItemStatus::Processing => {
                    match item.complete_failed(String::new(), STEP_INTERRUPTED.to_string()) {
                        Ok(()) => Some(
                            HistoryRecord::new(
                                item.address.clone(),
                                String::new(),
                                DeliveryStatus::Failed,
                                self.spec.provider.as_str(),
                                self.spec.model.clone(),
                                self.spec.language.clone(),
                            )
                            .with_error(Some(STEP_INTERRUPTED.to_string())),
                        ),
                        Err(e) => {
                            error!(index, error = %e, "Campaign item state rejected");
                            None
                        }
                    }
                }
                _ => None,
            }
        };

        if let Some(record) = record {
            warn!(index, address = %record.address, "Campaign step interrupted");
            self.recorder.record(&record);
            self.emit_snapshot(index);
        }
        self.cursor.store(index + 1, Ordering::Release);
    }

    /// Process the item at the cursor.
    ///
    /// Dropping the returned future part way fails the claimed item (unless it
    /// already reached a terminal state) and advances past it.
    pub async fn step(&self) -> StepOutcome {
        let mut guard = match self.claim() {
            Some(guard) => guard,
            None => {
                debug!("Campaign step already in flight; ignoring");
                return StepOutcome::InFlight;
            }
        };

        let index = self.cursor.load(Ordering::Acquire);
        let claimed = {
            let mut items = self.items.lock();
            match items.get_mut(index) {
                None => None,
                Some(item) => match item.begin() {
                    Ok(()) => Some(Ok(item.address.clone())),
                    Err(e) => Some(Err((e, item.status))),
                },
            }
        };

        let address = match claimed {
            None => return StepOutcome::Exhausted,
            Some(Err((e, status))) => {
                error!(index, error = %e, "Campaign item already processed; skipping");
                self.cursor.store(index + 1, Ordering::Release);
                return StepOutcome::Processed { index, status };
            }
            Some(Ok(address)) => address,
        };
        guard.claimed = Some(index);

        debug!(index, address = %address, "Processing campaign item");
        self.emit_snapshot(index);

        let outcome = match AssertUnwindSafe(self.process(&address)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(index, address = %address, error = %message, "Campaign item faulted");
                ItemOutcome::failed(String::new(), message)
            }
        };

        let record = HistoryRecord::new(
            address.clone(),
            outcome.text.clone(),
            outcome.status(),
            self.spec.provider.as_str(),
            self.spec.model.clone(),
            self.spec.language.clone(),
        )
        .with_error(outcome.error.clone())
        .with_message_id(outcome.message_id.clone());

        let status = {
            let mut items = self.items.lock();
            match items.get_mut(index) {
                Some(item) => {
                    let applied = match outcome.error {
                        None => item.complete_sent(outcome.text, outcome.message_id),
                        Some(err) => item.complete_failed(outcome.text, err),
                    };
                    if let Err(e) = applied {
                        error!(index, error = %e, "Campaign item state rejected");
                    }
                    item.status
                }
                None => ItemStatus::Failed,
            }
        };

        match status {
            ItemStatus::Sent => info!(index, address = %address, "SMS sent"),
            _ => warn!(index, address = %address, error = ?record.error, "SMS failed"),
        }

        self.recorder.record_blocking(record).await;
        self.emit_snapshot(index);

        if !self.config.pace.is_zero() {
            tokio::time::sleep(self.config.pace).await;
        }

        self.cursor.store(index + 1, Ordering::Release);
        guard.claimed = None;
        StepOutcome::Processed { index, status }
    }

    async fn process(&self, address: &str) -> ItemOutcome {
        let user_prompt = render_user_prompt(address, &self.spec.language);
        let text = match self
            .generator
            .generate(&self.system_prompt, &user_prompt, self.config.completion.clone())
            .await
        {
            Ok(text) => text,
            Err(e) => return ItemOutcome::failed(String::new(), e.detail()),
        };

        let receipt = self.gateway.send(address, &text).await;
        if receipt.success {
            ItemOutcome::sent(text, receipt.identifier)
        } else {
            let error = receipt
                .error
                .unwrap_or_else(|| DELIVERY_FAILED.to_string());
            ItemOutcome::failed(text, error)
        }
    }

    /// Step until every item is processed, then settle and signal completion.
    pub async fn run_to_completion(&self) -> CampaignReport {
        self.emit(CampaignEvent::Started { total: self.len() });
        info!(
            total = self.len(),
            provider = self.spec.provider.as_str(),
            model = %self.spec.model,
            "Campaign started"
        );

        loop {
            match self.step().await {
                StepOutcome::Processed { .. } => {}
                StepOutcome::InFlight => tokio::task::yield_now().await,
                StepOutcome::Exhausted => break,
            }
        }

        self.finish().await
    }

    /// Completion fires at most once; later calls return the same report silently.
    async fn finish(&self) -> CampaignReport {
        if self
            .completed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return self.report();
        }

        if !self.config.settle.is_zero() {
            tokio::time::sleep(self.config.settle).await;
        }

        let report = self.report();
        info!(
            total = report.summary.total,
            sent = report.summary.sent,
            failed = report.summary.failed,
            "Campaign completed"
        );
        self.emit(CampaignEvent::Completed(report.clone()));
        report
    }

    fn report(&self) -> CampaignReport {
        let items = self.items.lock().clone();
        CampaignReport {
            summary: CampaignSummary::from_items(&items),
            items,
            provider: self.spec.provider.as_str().to_string(),
            model: self.spec.model.clone(),
            language: self.spec.language.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Holds the in-flight slot for one step and releases it on drop.
struct StepGuard<'a> {
    sequencer: &'a CampaignSequencer,
    /// Item index claimed by this step and not yet advanced past
    claimed: Option<usize>,
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        if let Some(index) = self.claimed.take() {
            self.sequencer.abandon(index);
        }
        self.sequencer.in_flight.store(false, Ordering::Release);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected fault while processing item".to_string()
    }
}
