//! The persistence seam.
//!
//! `SnapshotStore` is the boundary between the in-memory record store and
//! wherever snapshots live. The shell only ever talks to a
//! `dyn SnapshotStore`; backends live in `clinic-persist`.

use clinic_contracts::{error::ClinicResult, persistence::SnapshotReceipt};

use crate::store::RecordStore;

/// Saves and loads whole-store snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Persist every container of `store`, replacing any earlier snapshot.
    ///
    /// A failed save must leave the earlier snapshot readable.
    fn save(&self, store: &RecordStore) -> ClinicResult<SnapshotReceipt>;

    /// Read the latest snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet, and an error when a
    /// snapshot exists but cannot be read or trusted.
    fn load(&self) -> ClinicResult<Option<RecordStore>>;

    /// Human-readable location used in log lines and messages.
    fn describe(&self) -> String;
}
