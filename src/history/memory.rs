use crate::error::StorageError;
use crate::history::{HistoryRecord, HistoryStore};
use parking_lot::Mutex;

/// Process-local history, for tests and dry runs.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in insertion order.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(self.records.lock().iter().rev().cloned().collect())
    }

    fn clear(&self) -> Result<usize, StorageError> {
        let mut records = self.records.lock();
        let removed = records.len();
        records.clear();
        Ok(removed)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
