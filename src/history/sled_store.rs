//! Durable sled-backed history store.

use std::path::Path;

use sled::{Db, Tree};

use crate::error::StorageError;
use crate::history::{HistoryRecord, HistoryStore};

const TREE_HISTORY: &str = "history";

#[derive(Clone)]
pub struct SledHistoryStore {
    db: Db,
    records: Tree,
}

impl SledHistoryStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::new(db)
    }

    pub fn new(db: Db) -> Result<Self, StorageError> {
        let records = db.open_tree(TREE_HISTORY)?;
        Ok(Self { db, records })
    }

    /// Throwaway store that lives only as long as the handle.
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::new(db)
    }
}

fn to_storage_data(err: serde_json::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}

impl HistoryStore for SledHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        // Monotonic ids keep keys in insertion order
        let key = self.db.generate_id()?.to_be_bytes();
        let value = serde_json::to_vec(record).map_err(to_storage_data)?;
        self.records.insert(key, value)?;
        self.records.flush()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let mut out = Vec::new();
        for result in self.records.iter().rev() {
            let (_, value) = result?;
            let record: HistoryRecord = serde_json::from_slice(&value)
                .map_err(|e| StorageError::Deserialization(e.to_string()))?;
            out.push(record);
        }
        Ok(out)
    }

    fn clear(&self) -> Result<usize, StorageError> {
        let removed = self.records.len();
        self.records.clear()?;
        self.records.flush()?;
        Ok(removed)
    }

    fn backend_name(&self) -> &str {
        "sled"
    }
}
