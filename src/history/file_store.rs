//! Append-only JSON lines history file.

use crate::error::StorageError;
use crate::history::{HistoryRecord, HistoryStore};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct JsonlHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(line) {
                Ok(record) => records.push(record),
                // Partial line from a torn write
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    error = %e,
                    "Skipping unreadable history line"
                ),
            }
        }
        Ok(records)
    }
}

impl HistoryStore for JsonlHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let line = serde_json::to_string(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let _guard = self.lock.lock();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        file.sync_data()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        let _guard = self.lock.lock();
        let mut records = self.read_all()?;
        records.reverse();
        Ok(records)
    }

    fn clear(&self) -> Result<usize, StorageError> {
        let _guard = self.lock.lock();
        let removed = self.read_all()?.len();
        if self.path.exists() {
            std::fs::File::create(&self.path)?;
        }
        Ok(removed)
    }

    fn backend_name(&self) -> &str {
        "file"
    }
}
