use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::leave::{LeaveData, LeaveStorage, LeaveStore, StorageError};

/// Storage double that keeps every persisted snapshot in memory.
#[derive(Default)]
pub(super) struct MemoryStorage {
    initial: Option<LeaveData>,
    persisted: Mutex<Vec<LeaveData>>,
}

impl MemoryStorage {
    pub(super) fn with_data(data: LeaveData) -> Self {
        Self {
            initial: Some(data),
            persisted: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn persisted(&self) -> Vec<LeaveData> {
        self.persisted.lock().expect("storage mutex poisoned").clone()
    }
}

impl LeaveStorage for MemoryStorage {
    fn load(&self) -> Result<LeaveData, StorageError> {
        self.initial
            .clone()
            .ok_or_else(|| StorageError::Unavailable("nothing stored yet".to_string()))
    }

    fn persist(&self, data: &LeaveData) -> Result<(), StorageError> {
        self.persisted
            .lock()
            .expect("storage mutex poisoned")
            .push(data.clone());
        Ok(())
    }
}

/// Storage double whose writes always fail.
#[derive(Default)]
pub(super) struct FailingStorage {
    pub(super) attempts: AtomicUsize,
}

impl FailingStorage {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl LeaveStorage for FailingStorage {
    fn load(&self) -> Result<LeaveData, StorageError> {
        Ok(LeaveData::builtin())
    }

    fn persist(&self, _data: &LeaveData) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn builtin_store() -> (LeaveStore<MemoryStorage>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::with_data(LeaveData::builtin()));
    let store = LeaveStore::open(storage.clone());
    (store, storage)
}

pub(super) fn failing_store() -> (LeaveStore<FailingStorage>, Arc<FailingStorage>) {
    let storage = Arc::new(FailingStorage::default());
    let store = LeaveStore::open(storage.clone());
    (store, storage)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
