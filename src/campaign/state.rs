//! Per-item state machine and aggregate counters.
//!
//! `queued -> processing -> {sent | failed}`. Terminal states never change again;
//! the transition methods refuse anything else.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Queued,
    Processing,
    Sent,
    Failed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Queued => "queued",
            ItemStatus::Processing => "processing",
            ItemStatus::Sent => "sent",
            ItemStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Sent | ItemStatus::Failed)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid item transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: ItemStatus,
    pub to: ItemStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub index: usize,
    pub address: String,
    pub status: ItemStatus,
    /// Set once generation succeeds; empty otherwise
    pub generated_text: String,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl ItemState {
    pub fn new(index: usize, address: impl Into<String>) -> Self {
        Self {
            index,
            address: address.into(),
            status: ItemStatus::Queued,
            generated_text: String::new(),
            error: None,
            message_id: None,
        }
    }

    fn transition(&mut self, expected: ItemStatus, to: ItemStatus) -> Result<(), TransitionError> {
        if self.status != expected {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.transition(ItemStatus::Queued, ItemStatus::Processing)
    }

    pub fn complete_sent(
        &mut self,
        text: String,
        message_id: Option<String>,
    ) -> Result<(), TransitionError> {
        self.transition(ItemStatus::Processing, ItemStatus::Sent)?;
        self.generated_text = text;
        self.message_id = message_id;
        self.error = None;
        Ok(())
    }

    pub fn complete_failed(&mut self, text: String, error: String) -> Result<(), TransitionError> {
        self.transition(ItemStatus::Processing, ItemStatus::Failed)?;
        self.generated_text = text;
        self.error = Some(error);
        Ok(())
    }
}

/// Aggregate counters shown beside the live item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    /// Still queued
    pub pending: usize,
    pub processing: usize,
}

impl CampaignSummary {
    pub fn from_items(items: &[ItemState]) -> Self {
        let mut summary = CampaignSummary {
            total: items.len(),
            ..CampaignSummary::default()
        };
        for item in items {
            match item.status {
                ItemStatus::Queued => summary.pending += 1,
                ItemStatus::Processing => summary.processing += 1,
                ItemStatus::Sent => summary.sent += 1,
                ItemStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }

    pub fn processed(&self) -> usize {
        self.sent + self.failed
    }

    pub fn is_finished(&self) -> bool {
        self.processed() == self.total
    }
}

/// Immutable view of every item after one state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    /// Index of the item that changed
    pub index: usize,
    pub items: Vec<ItemState>,
    pub summary: CampaignSummary,
}

impl CampaignSnapshot {
    pub fn new(index: usize, items: Vec<ItemState>) -> Self {
        let summary = CampaignSummary::from_items(&items);
        Self {
            index,
            items,
            summary,
        }
    }

    pub fn changed(&self) -> Option<&ItemState> {
        self.items.get(self.index)
    }
}
