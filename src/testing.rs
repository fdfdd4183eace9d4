//! Fixtures shared by the unit and HTTP tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::notify::{Notifier, NotifyError, RequestNotice};
use crate::store::{SqliteStore, Store};

/// Fresh in-memory SQLite store with the schema in place.
pub async fn memory_store() -> Arc<dyn Store> {
    let store = SqliteStore::in_memory().await.unwrap();
    store.init_schema().await.unwrap();
    Arc::new(store)
}

/// Keeps every notice it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<RequestNotice>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<RequestNotice> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, notice: &RequestNotice) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Relay that always refuses.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn dispatch(&self, _notice: &RequestNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected(503))
    }
}
