//! Primary store with a secondary that only takes writes.
//!
//! `append` falls back when the primary fails. Reads and `clear` go to the primary
//! alone and surface its error.

use crate::error::StorageError;
use crate::history::{HistoryFilter, HistoryRecord, HistoryStats, HistoryStore};
use std::sync::Arc;
use tracing::warn;

pub struct FallbackHistoryStore {
    primary: Arc<dyn HistoryStore>,
    fallback: Arc<dyn HistoryStore>,
    name: String,
}

impl FallbackHistoryStore {
    pub fn new(primary: Arc<dyn HistoryStore>, fallback: Arc<dyn HistoryStore>) -> Self {
        let name = format!("{}+{}", primary.backend_name(), fallback.backend_name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

impl HistoryStore for FallbackHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        match self.primary.append(record) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    primary = self.primary.backend_name(),
                    fallback = self.fallback.backend_name(),
                    error = %e,
                    "Primary history store failed; writing to fallback"
                );
                self.fallback.append(record)
            }
        }
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        self.primary.list()
    }

    fn clear(&self) -> Result<usize, StorageError> {
        self.primary.clear()
    }

    fn backend_name(&self) -> &str {
        &self.name
    }

    fn search(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRecord>, StorageError> {
        self.primary.search(filter)
    }

    fn stats(&self) -> Result<HistoryStats, StorageError> {
        self.primary.stats()
    }
}
