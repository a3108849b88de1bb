//! Save and load wrappers around a `SnapshotStore`.
//!
//! These add the parts every backend shares: integrity checks on loaded
//! data, the choice between replace and merge, and structured logging.

use tracing::{info, warn};

use clinic_contracts::{
    error::{ClinicError, ClinicResult},
    persistence::{LoadMode, SnapshotReceipt, StoreCounts},
};

use crate::{store::RecordStore, traits::SnapshotStore};

/// Save `store` through `snapshots`.
pub fn save_from(
    store: &RecordStore,
    snapshots: &dyn SnapshotStore,
) -> ClinicResult<SnapshotReceipt> {
    match snapshots.save(store) {
        Ok(receipt) => {
            info!(
                location = %snapshots.describe(),
                snapshot_id = %receipt.snapshot_id,
                records = receipt.counts.total(),
                checksum = %receipt.checksum,
                "snapshot saved"
            );
            Ok(receipt)
        }
        Err(e) => {
            warn!(location = %snapshots.describe(), error = %e, "snapshot save failed");
            Err(e)
        }
    }
}

/// Load the latest snapshot into `store` using `mode`.
///
/// Returns the counts of what was loaded, or `None` if there was no
/// snapshot. On any error `store` is left exactly as it was.
pub fn load_into(
    store: &mut RecordStore,
    snapshots: &dyn SnapshotStore,
    mode: LoadMode,
) -> ClinicResult<Option<StoreCounts>> {
    let loaded = match snapshots.load() {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            info!(location = %snapshots.describe(), "no snapshot found; starting empty");
            return Ok(None);
        }
        Err(e) => {
            warn!(location = %snapshots.describe(), error = %e, "snapshot load failed");
            return Err(e);
        }
    };

    if let Err(reason) = loaded.check_integrity() {
        warn!(
            location = %snapshots.describe(),
            reason = %reason,
            "snapshot failed integrity check"
        );
        return Err(ClinicError::SnapshotCorrupt { reason });
    }

    let counts = loaded.counts();
    store.restore(loaded, mode);

    info!(
        location = %snapshots.describe(),
        mode = ?mode,
        loaded = counts.total(),
        now_held = store.counts().total(),
        "snapshot loaded"
    );
    Ok(Some(counts))
}
