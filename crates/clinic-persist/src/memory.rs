//! In-memory snapshot store.
//!
//! `InMemorySnapshotStore` holds the encoded snapshot document as a string
//! behind a `Mutex`, going through the same encode/decode path as the file
//! store. It backs sessions started with persistence disabled and tests
//! that need a `SnapshotStore` without touching disk.

use std::sync::Mutex;

use clinic_contracts::{
    error::{ClinicError, ClinicResult},
    persistence::SnapshotReceipt,
};
use clinic_core::{RecordStore, SnapshotStore};

use crate::envelope::{decode_snapshot, encode_snapshot};

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    pub(crate) document: Mutex<Option<String>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, store: &RecordStore) -> ClinicResult<SnapshotReceipt> {
        let (text, receipt) = encode_snapshot(store)?;
        let mut doc = self.document.lock().map_err(|e| ClinicError::SnapshotIo {
            path: self.describe(),
            reason: format!("snapshot lock poisoned: {}", e),
        })?;
        *doc = Some(text);
        Ok(receipt)
    }

    fn load(&self) -> ClinicResult<Option<RecordStore>> {
        let doc = self.document.lock().map_err(|e| ClinicError::SnapshotIo {
            path: self.describe(),
            reason: format!("snapshot lock poisoned: {}", e),
        })?;
        match doc.as_deref() {
            Some(text) => decode_snapshot(text).map(|envelope| Some(envelope.records)),
            None => Ok(None),
        }
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
