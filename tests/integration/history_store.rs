//! Integration tests for delivery history backends

use smsagent::config::{HistoryBackend, StorageConfig};
use smsagent::error::StorageError;
use smsagent::history::{
    open_history_store, DeliveryStatus, FallbackHistoryStore, HistoryFilter, HistoryRecord,
    HistoryRecorder, HistoryStore, JsonlHistoryStore, SledHistoryStore,
};
use std::sync::Arc;
use tempfile::TempDir;

fn record(address: &str, text: &str, status: DeliveryStatus) -> HistoryRecord {
    HistoryRecord::new(address, text, status, "groq", "llama3-8b-8192", "english")
}

fn storage(dir: &TempDir, backend: HistoryBackend) -> StorageConfig {
    StorageConfig {
        history_backend: backend,
        data_dir: Some(dir.path().join("data")),
    }
}

struct BrokenStore;

impl HistoryStore for BrokenStore {
    fn append(&self, _record: &HistoryRecord) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn clear(&self) -> Result<usize, StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }

    fn backend_name(&self) -> &str {
        "broken"
    }
}

#[test]
fn test_sled_backend_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let config = storage(&dir, HistoryBackend::Sled);
    {
        let store = open_history_store(&config).unwrap();
        assert_eq!(store.backend_name(), "sled+file");
        store.append(&record("+1555000001", "first", DeliveryStatus::Sent)).unwrap();
        store
            .append(&record("+1555000002", "", DeliveryStatus::Failed).with_error(Some(
                "rate limited".to_string(),
            )))
            .unwrap();
    }

    let reopened = open_history_store(&config).unwrap();
    let records = reopened.list().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].address, "+1555000002");
    assert_eq!(records[0].error.as_deref(), Some("rate limited"));
    assert_eq!(records[1].text, "first");
    assert!(dir.path().join("data").join("history.db").exists());
}

#[test]
fn test_file_backend_is_plain_json_lines() {
    let dir = TempDir::new().unwrap();
    let store = open_history_store(&storage(&dir, HistoryBackend::File)).unwrap();
    assert_eq!(store.backend_name(), "file");

    store.append(&record("+1", "hello", DeliveryStatus::Sent)).unwrap();
    store.append(&record("+2", "bye", DeliveryStatus::Sent)).unwrap();

    let content =
        std::fs::read_to_string(dir.path().join("data").join("history.jsonl")).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["address"], "+1");
    assert_eq!(first["status"], "sent");
}

#[test]
fn test_unopenable_sled_uses_file_alone() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    // A plain file where the sled directory should be.
    std::fs::write(data.join("history.db"), "not a database").unwrap();

    let store = open_history_store(&storage(&dir, HistoryBackend::Sled)).unwrap();
    assert_eq!(store.backend_name(), "file");
    store.append(&record("+1", "hello", DeliveryStatus::Sent)).unwrap();
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_fallback_takes_writes_the_primary_refuses() {
    let dir = TempDir::new().unwrap();
    let file = Arc::new(JsonlHistoryStore::new(dir.path().join("fallback.jsonl")));
    let store = FallbackHistoryStore::new(Arc::new(BrokenStore), file.clone());
    assert_eq!(store.backend_name(), "broken+file");

    store.append(&record("+1", "hello", DeliveryStatus::Sent)).unwrap();
    assert_eq!(file.list().unwrap().len(), 1);
    // Reads stay on the primary.
    assert!(store.list().is_err());
}

#[test]
fn test_recorder_swallows_total_failure() {
    let recorder = HistoryRecorder::new(Arc::new(BrokenStore));
    assert!(!recorder.record(&record("+1", "hello", DeliveryStatus::Sent)));

    let sled = Arc::new(SledHistoryStore::temporary().unwrap());
    let recorder = HistoryRecorder::new(sled.clone());
    assert!(recorder.record(&record("+1", "hello", DeliveryStatus::Sent)));
    assert_eq!(sled.list().unwrap().len(), 1);
}

#[test]
fn test_search_stats_and_clear() {
    let store = SledHistoryStore::temporary().unwrap();
    store.append(&record("+15551110000", "Sale ends Friday", DeliveryStatus::Sent)).unwrap();
    store
        .append(&record("+15552220000", "", DeliveryStatus::Failed).with_error(Some(
            "Invalid 'To' Phone Number".to_string(),
        )))
        .unwrap();
    store.append(&record("+15553330000", "New sale items", DeliveryStatus::Sent)).unwrap();

    let by_text = store
        .search(&HistoryFilter {
            query: Some("SALE".to_string()),
            ..HistoryFilter::default()
        })
        .unwrap();
    assert_eq!(by_text.len(), 2);
    assert_eq!(by_text[0].address, "+15553330000");

    let failed = store
        .search(&HistoryFilter {
            status: Some(DeliveryStatus::Failed),
            ..HistoryFilter::default()
        })
        .unwrap();
    assert_eq!(failed.len(), 1);

    let limited = store
        .search(&HistoryFilter {
            limit: Some(1),
            ..HistoryFilter::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);

    let stats = store.stats().unwrap();
    assert_eq!((stats.total, stats.sent, stats.failed), (3, 2, 1));
    assert_eq!(stats.by_provider.get("groq"), Some(&3));

    assert_eq!(store.clear().unwrap(), 3);
    assert!(store.list().unwrap().is_empty());
    assert_eq!(store.stats().unwrap().success_rate(), 0.0);
}
