//! File-backed snapshot store.
//!
//! `JsonFileSnapshotStore` keeps one snapshot document at a fixed path.
//! Saves go to a sibling `<name>.tmp` file that is flushed to disk and then
//! renamed over the target, so the previous snapshot survives any failed
//! save. File handles are scoped to each call and closed on every path.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use clinic_contracts::{
    error::{ClinicError, ClinicResult},
    persistence::SnapshotReceipt,
};
use clinic_core::{RecordStore, SnapshotStore};

use crate::envelope::{decode_snapshot, encode_snapshot};

#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The staging file a save writes before it is renamed into place.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, e: io::Error) -> ClinicError {
        ClinicError::SnapshotIo {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn save(&self, store: &RecordStore) -> ClinicResult<SnapshotReceipt> {
        let (text, receipt) = encode_snapshot(store)?;
        let tmp = self.temp_path();

        debug!(tmp = %tmp.display(), bytes = text.len(), "writing snapshot staging file");

        let written =
            write_synced(&tmp, text.as_bytes()).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            // Leave the real snapshot alone; drop the partial staging file.
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(e));
        }

        Ok(receipt)
    }

    fn load(&self) -> ClinicResult<Option<RecordStore>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let envelope = decode_snapshot(&text)?;
        debug!(
            snapshot_id = %envelope.snapshot_id,
            saved_at = %envelope.saved_at,
            "snapshot decoded"
        );
        Ok(Some(envelope.records))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
