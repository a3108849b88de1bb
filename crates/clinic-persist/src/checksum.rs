//! Snapshot checksums.
//!
//! The checksum is SHA-256 over the compact JSON of the record store. The
//! store's field order is fixed and its maps are ordered, so serializing
//! the same contents always yields the same bytes.

use sha2::{Digest, Sha256};

use clinic_contracts::error::{ClinicError, ClinicResult};
use clinic_core::RecordStore;

/// Return the lowercase 64-character hex SHA-256 of `store`.
pub fn hash_records(store: &RecordStore) -> ClinicResult<String> {
    let bytes = serde_json::to_vec(store).map_err(|e| ClinicError::SnapshotCorrupt {
        reason: format!("records could not be serialized: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// True if `checksum` matches the hash of `store`.
pub fn verify_records(store: &RecordStore, checksum: &str) -> ClinicResult<bool> {
    Ok(hash_records(store)? == checksum)
}
