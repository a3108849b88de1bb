//! Types shared between the record store and snapshot backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a loaded snapshot is combined with the live store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadMode {
    /// Discard current contents and take the snapshot as-is.
    #[default]
    Replace,
    /// Append loaded lists and union loaded maps into the current contents.
    /// Loading the same snapshot twice duplicates list-backed records.
    Merge,
}

/// Per-container record counts, used in log lines and receipts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub patients: usize,
    pub appointments: usize,
    pub ehr_records: usize,
    pub billing_records: usize,
    pub inventory_items: usize,
    pub staff: usize,
}

impl StoreCounts {
    pub fn total(&self) -> usize {
        self.patients
            + self.appointments
            + self.ehr_records
            + self.billing_records
            + self.inventory_items
            + self.staff
    }
}

/// What a successful save produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReceipt {
    pub snapshot_id: Uuid,
    pub saved_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 of the serialized records.
    pub checksum: String,
    pub counts: StoreCounts,
}
