//! # clinic-persist
//!
//! Snapshot storage for the clinic record store.
//!
//! ## Overview
//!
//! A snapshot is the whole `RecordStore` wrapped in a small JSON envelope
//! carrying a format version, a snapshot id, a save time and a SHA-256
//! checksum of the records. Loading rejects unknown versions and checksum
//! mismatches, so a damaged file is reported instead of silently loaded.
//!
//! Two `SnapshotStore` backends are provided:
//!
//! - [`JsonFileSnapshotStore`]: one file, replaced atomically on save.
//! - [`InMemorySnapshotStore`]: the same document kept in memory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinic_core::{load_into, save_from, RecordStore};
//! use clinic_persist::JsonFileSnapshotStore;
//!
//! let snapshots = JsonFileSnapshotStore::new("hospitalData.json");
//! let mut store = RecordStore::new();
//! load_into(&mut store, &snapshots, LoadMode::Replace)?;
//! save_from(&store, &snapshots)?;
//! ```

pub mod checksum;
pub mod envelope;
pub mod file;
pub mod memory;

pub use checksum::{hash_records, verify_records};
pub use envelope::{decode_snapshot, encode_snapshot, SnapshotEnvelope, FORMAT_VERSION};
pub use file::JsonFileSnapshotStore;
pub use memory::InMemorySnapshotStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use clinic_contracts::{error::ClinicError, persistence::LoadMode};
    use clinic_core::{
        handlers::{self, HandlerOptions},
        load_into, save_from, RecordStore, SnapshotStore,
    };

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A store exercising every container, built through the handlers.
    fn populated() -> RecordStore {
        let mut store = RecordStore::new();
        let opts = HandlerOptions::default();

        for (id, name) in [("P1", "Ada Lovelace"), ("P2", "Alan Turing")] {
            handlers::register_patient(
                &mut store,
                opts,
                handlers::RegisterPatient { id, name, contact_info: "555-0100" },
            )
            .unwrap();
        }
        handlers::schedule_appointment(
            &mut store,
            handlers::ScheduleAppointment {
                patient_id: "P2",
                date: "2024-02-29",
                doctor: "Dr. Hopper",
                reason: "follow-up",
            },
        )
        .unwrap();
        handlers::schedule_appointment(
            &mut store,
            handlers::ScheduleAppointment {
                patient_id: "P1",
                date: "2024-01-05",
                doctor: "Dr. Hopper",
                reason: "intake",
            },
        )
        .unwrap();
        handlers::update_ehr(
            &mut store,
            handlers::UpdateEhr { patient_id: "P1", date: "2024-01-05", note: "first visit" },
        )
        .unwrap();
        for amount in ["19.99", "0.02"] {
            handlers::add_charge(
                &mut store,
                handlers::AddCharge { patient_id: "P1", description: "visit", amount },
            )
            .unwrap();
        }
        handlers::manage_inventory(
            &mut store,
            handlers::ManageInventory { name: "Syringe", quantity: "100", price: Some("0.75") },
        )
        .unwrap();
        handlers::register_staff(
            &mut store,
            opts,
            handlers::RegisterStaff { id: "S1", name: "Grace", role: "nurse" },
        )
        .unwrap();
        store
    }

    // ── Checksum ──────────────────────────────────────────────────────────────

    #[test]
    fn test_checksum_is_stable_hex() {
        let store = populated();
        let a = hash_records(&store).unwrap();
        let b = hash_records(&store.clone()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, hash_records(&RecordStore::new()).unwrap());
    }

    // ── Envelope ──────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_decode_preserves_everything() {
        let store = populated();
        let (text, receipt) = encode_snapshot(&store).unwrap();

        let envelope = decode_snapshot(&text).unwrap();
        assert_eq!(envelope.format_version, FORMAT_VERSION);
        assert_eq!(envelope.snapshot_id, receipt.snapshot_id);
        assert_eq!(envelope.checksum, receipt.checksum);
        assert_eq!(envelope.records, store);

        // Order of list-backed containers is preserved.
        let reasons: Vec<&str> = envelope
            .records
            .appointments()
            .iter()
            .map(|a| a.reason.as_str())
            .collect();
        assert_eq!(reasons, ["follow-up", "intake"]);
        assert_eq!(envelope.records.billing("P1").unwrap().total().to_string(), "20.01");
    }

    #[test]
    fn test_decode_rejects_tampered_records() {
        let (text, _) = encode_snapshot(&populated()).unwrap();
        let tampered = text.replace("Ada Lovelace", "Eve");

        let err = decode_snapshot(&tampered).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"), "got: {err}");
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let (text, _) = encode_snapshot(&populated()).unwrap();
        let future = text.replace("\"format_version\": 1", "\"format_version\": 99");

        let err = decode_snapshot(&future).unwrap_err();
        assert!(err.to_string().contains("unsupported format_version 99"), "got: {err}");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for text in ["", "not json", "{}", "{\"format_version\": 1}"] {
            assert!(
                matches!(decode_snapshot(text), Err(ClinicError::SnapshotCorrupt { .. })),
                "{text:?} must be rejected"
            );
        }
    }

    // ── File store ────────────────────────────────────────────────────────────

    #[test]
    fn test_file_round_trip_into_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("clinic.json"));
        let original = populated();

        let receipt = save_from(&original, &snapshots).unwrap();
        assert_eq!(receipt.counts, original.counts());
        assert!(!snapshots.temp_path().exists(), "staging file must be renamed away");

        let mut fresh = RecordStore::new();
        load_into(&mut fresh, &snapshots, LoadMode::Replace).unwrap();
        assert_eq!(fresh, original);
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("absent.json"));
        assert!(snapshots.load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("clinic.json"));

        save_from(&populated(), &snapshots).unwrap();
        save_from(&RecordStore::new(), &snapshots).unwrap();

        assert!(snapshots.load().unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("clinic.json"));
        let original = populated();
        save_from(&original, &snapshots).unwrap();

        // A directory squatting on the staging path makes the next save fail.
        fs::create_dir(snapshots.temp_path()).unwrap();
        let err = save_from(&RecordStore::new(), &snapshots).unwrap_err();
        assert!(matches!(err, ClinicError::SnapshotIo { .. }));

        assert_eq!(snapshots.load().unwrap().unwrap(), original);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("nope").join("clinic.json"));

        let err = snapshots.save(&populated()).unwrap_err();
        assert!(err.to_string().contains("clinic.json"));
    }

    #[test]
    fn test_corrupt_file_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.json");
        fs::write(&path, "{ this is not a snapshot").unwrap();
        let snapshots = JsonFileSnapshotStore::new(&path);

        let mut store = RecordStore::new();
        let err = load_into(&mut store, &snapshots, LoadMode::Replace).unwrap_err();

        assert!(matches!(err, ClinicError::SnapshotCorrupt { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_merge_load_twice_duplicates_and_replace_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = JsonFileSnapshotStore::new(dir.path().join("clinic.json"));
        let original = populated();
        save_from(&original, &snapshots).unwrap();

        let mut merged = RecordStore::new();
        load_into(&mut merged, &snapshots, LoadMode::Merge).unwrap();
        load_into(&mut merged, &snapshots, LoadMode::Merge).unwrap();
        assert_eq!(merged.patients().len(), 2 * original.patients().len());
        assert_eq!(merged.staff().len(), 2 * original.staff().len());
        assert_eq!(merged.counts().ehr_records, original.counts().ehr_records);

        let mut replaced = RecordStore::new();
        load_into(&mut replaced, &snapshots, LoadMode::Replace).unwrap();
        load_into(&mut replaced, &snapshots, LoadMode::Replace).unwrap();
        assert_eq!(replaced, original);
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        let snapshots = JsonFileSnapshotStore::new("/data/clinic.json");
        assert_eq!(
            snapshots.temp_path(),
            std::path::PathBuf::from("/data/clinic.json.tmp")
        );
    }

    // ── In-memory store ───────────────────────────────────────────────────────

    #[test]
    fn test_memory_round_trip() {
        let snapshots = InMemorySnapshotStore::new();
        assert!(snapshots.load().unwrap().is_none());

        save_from(&populated(), &snapshots).unwrap();
        let doc = snapshots.document.lock().unwrap().clone().unwrap();
        assert!(doc.contains("\"checksum\""));
        assert_eq!(snapshots.load().unwrap().unwrap(), populated());
    }

    #[test]
    fn test_memory_detects_tampering() {
        let snapshots = InMemorySnapshotStore::new();
        save_from(&populated(), &snapshots).unwrap();

        {
            let mut doc = snapshots.document.lock().unwrap();
            let edited = doc.as_ref().unwrap().replace("Syringe", "Scalpel");
            *doc = Some(edited);
        }

        assert!(matches!(
            snapshots.load(),
            Err(ClinicError::SnapshotCorrupt { .. })
        ));
    }

    #[test]
    fn test_memory_garbage_document_is_corrupt() {
        let snapshots = InMemorySnapshotStore {
            document: std::sync::Mutex::new(Some("garbage".to_string())),
        };
        assert!(matches!(
            snapshots.load(),
            Err(ClinicError::SnapshotCorrupt { .. })
        ));
    }
}
