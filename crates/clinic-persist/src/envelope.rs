//! The on-disk snapshot document.
//!
//! A snapshot is one JSON object:
//!
//! ```text
//! { "format_version": 1,
//!   "snapshot_id":   "<uuid v4>",
//!   "saved_at":      "<RFC 3339>",
//!   "checksum":      "<sha256 hex of records>",
//!   "records":       { "patients": [...], "appointments": [...],
//!                      "ehr": {...}, "billing": {...},
//!                      "inventory": [...], "staff": [...] } }
//! ```
//!
//! Decoding checks the version before touching `records`, then verifies the
//! checksum, so a document from a future layout or a damaged file is
//! reported as corrupt instead of half-loaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinic_contracts::{
    error::{ClinicError, ClinicResult},
    persistence::SnapshotReceipt,
};
use clinic_core::RecordStore;

use crate::checksum::{hash_records, verify_records};

/// Layout version written by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    format_version: u32,
    snapshot_id: Uuid,
    saved_at: DateTime<Utc>,
    checksum: &'a str,
    records: &'a RecordStore,
}

/// A decoded snapshot document.
#[derive(Debug, Deserialize)]
pub struct SnapshotEnvelope {
    pub format_version: u32,
    pub snapshot_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub checksum: String,
    pub records: RecordStore,
}

/// Serialize `store` into a pretty-printed snapshot document.
pub fn encode_snapshot(store: &RecordStore) -> ClinicResult<(String, SnapshotReceipt)> {
    let checksum = hash_records(store)?;
    let receipt = SnapshotReceipt {
        snapshot_id: Uuid::new_v4(),
        saved_at: Utc::now(),
        checksum,
        counts: store.counts(),
    };

    let doc = EnvelopeOut {
        format_version: FORMAT_VERSION,
        snapshot_id: receipt.snapshot_id,
        saved_at: receipt.saved_at,
        checksum: &receipt.checksum,
        records: store,
    };
    let text = serde_json::to_string_pretty(&doc).map_err(|e| ClinicError::SnapshotCorrupt {
        reason: format!("snapshot could not be serialized: {}", e),
    })?;

    Ok((text, receipt))
}

/// Parse and verify a snapshot document.
pub fn decode_snapshot(text: &str) -> ClinicResult<SnapshotEnvelope> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| corrupt(format!("not valid JSON: {}", e)))?;

    let version = value
        .get("format_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| corrupt("missing format_version".to_string()))?;
    if version != u64::from(FORMAT_VERSION) {
        return Err(corrupt(format!(
            "unsupported format_version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }

    let envelope: SnapshotEnvelope = serde_json::from_value(value)
        .map_err(|e| corrupt(format!("unexpected layout: {}", e)))?;

    if !verify_records(&envelope.records, &envelope.checksum)? {
        return Err(corrupt(format!(
            "checksum mismatch for snapshot {}",
            envelope.snapshot_id
        )));
    }

    Ok(envelope)
}

fn corrupt(reason: String) -> ClinicError {
    ClinicError::SnapshotCorrupt { reason }
}
