//! Delivery History
//!
//! One [`HistoryRecord`] per campaign item, whatever the outcome. Records are
//! append-only; the only deletion is a bulk [`HistoryStore::clear`]. The backend is
//! picked once at startup by [`open_history_store`], and the campaign sequencer only
//! ever sees it through a best-effort [`HistoryRecorder`].

use crate::config::{HistoryBackend, StorageConfig};
use crate::error::{ApiError, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod fallback;
pub mod file_store;
pub mod memory;
pub mod sled_store;

pub use fallback::FallbackHistoryStore;
pub use file_store::JsonlHistoryStore;
pub use memory::MemoryHistoryStore;
pub use sled_store::SledHistoryStore;

/// Final outcome of one campaign item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sent" => Ok(DeliveryStatus::Sent),
            "failed" => Ok(DeliveryStatus::Failed),
            other => Err(ApiError::ConfigError(format!(
                "Invalid status filter: {}. Must be sent or failed",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    /// Destination address
    pub address: String,
    /// Generated text; empty when generation never completed
    #[serde(default)]
    pub text: String,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub provider: String,
    pub model: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    /// Gateway-assigned message id on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

static RECORD_SEQ: AtomicU32 = AtomicU32::new(0);

/// Time-ordered hex id, unique within the process.
fn next_record_id(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis().max(0) as u64;
    let seq = RECORD_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut bytes = [0u8; 12];
    bytes[..8].copy_from_slice(&millis.to_be_bytes());
    bytes[8..].copy_from_slice(&seq.to_be_bytes());
    hex::encode(bytes)
}

impl HistoryRecord {
    pub fn new(
        address: impl Into<String>,
        text: impl Into<String>,
        status: DeliveryStatus,
        provider: impl Into<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: next_record_id(created_at),
            address: address.into(),
            text: text.into(),
            status,
            error: None,
            provider: provider.into(),
            model: model.into(),
            language: language.into(),
            created_at,
            message_id: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn with_message_id(mut self, message_id: Option<String>) -> Self {
        self.message_id = message_id;
        self
    }
}

/// Search criteria for [`HistoryStore::search`].
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Case-insensitive substring of address or text
    pub query: Option<String>,
    pub status: Option<DeliveryStatus>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                record.address.to_lowercase().contains(&q) || record.text.to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub by_provider: BTreeMap<String, usize>,
    pub latest: Option<DateTime<Utc>>,
}

impl HistoryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a HistoryRecord>) -> Self {
        let mut stats = HistoryStats::default();
        for record in records {
            stats.total += 1;
            match record.status {
                DeliveryStatus::Sent => stats.sent += 1,
                DeliveryStatus::Failed => stats.failed += 1,
            }
            *stats.by_provider.entry(record.provider.clone()).or_insert(0) += 1;
            if stats.latest.map_or(true, |t| record.created_at > t) {
                stats.latest = Some(record.created_at);
            }
        }
        stats
    }

    /// Share of records that were sent, 0.0 when empty.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sent as f64 / self.total as f64
        }
    }
}

/// Durable collection of delivery records.
pub trait HistoryStore: Send + Sync {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError>;

    /// All records, newest first.
    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError>;

    /// Remove every record; returns how many were removed.
    fn clear(&self) -> Result<usize, StorageError>;

    fn backend_name(&self) -> &str;

    fn search(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRecord>, StorageError> {
        let matching = self.list()?.into_iter().filter(|r| filter.matches(r));
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    fn stats(&self) -> Result<HistoryStats, StorageError> {
        Ok(HistoryStats::from_records(&self.list()?))
    }
}

/// Best-effort writer used by the campaign sequencer.
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Append `record`; failures are logged and swallowed.
    ///
    /// Blocks on backend I/O (sled flush, file sync). From async code use
    /// [`HistoryRecorder::record_blocking`].
    pub fn record(&self, record: &HistoryRecord) -> bool {
        match self.store.append(record) {
            Ok(()) => {
                debug!(
                    address = %record.address,
                    status = %record.status,
                    backend = self.store.backend_name(),
                    "History record appended"
                );
                true
            }
            Err(e) => {
                warn!(
                    address = %record.address,
                    status = %record.status,
                    error = %e,
                    "Failed to record history; continuing"
                );
                false
            }
        }
    }

    /// Run [`HistoryRecorder::record`] on the blocking pool.
    pub async fn record_blocking(&self, record: HistoryRecord) -> bool {
        let recorder = self.clone();
        match tokio::task::spawn_blocking(move || recorder.record(&record)).await {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(error = %e, "History write task failed; continuing");
                false
            }
        }
    }

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }
}

/// Open the configured history backend.
///
/// `sled` is wrapped with a JSON-lines fallback for writes. If the sled database
/// cannot be opened at all, the JSON-lines file is used on its own.
pub fn open_history_store(storage: &StorageConfig) -> Result<Arc<dyn HistoryStore>, ApiError> {
    let file_store = JsonlHistoryStore::new(storage.history_file_path()?);
    match storage.history_backend {
        HistoryBackend::File => Ok(Arc::new(file_store)),
        HistoryBackend::Sled => {
            let db_path = storage.history_db_path()?;
            match SledHistoryStore::open(&db_path) {
                Ok(sled_store) => Ok(Arc::new(FallbackHistoryStore::new(
                    Arc::new(sled_store),
                    Arc::new(file_store),
                ))),
                Err(e) => {
                    warn!(
                        path = %db_path.display(),
                        error = %e,
                        "Failed to open sled history; using JSON lines file"
                    );
                    Ok(Arc::new(file_store))
                }
            }
        }
    }
}
