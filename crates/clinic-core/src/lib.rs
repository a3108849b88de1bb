//! # clinic-core
//!
//! The in-memory record store for the clinic record keeper, the operation
//! handlers that validate and apply each menu action, and the
//! `SnapshotStore` seam that persistence backends implement.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinic_core::{handlers, RecordStore};
//!
//! let mut store = RecordStore::new();
//! handlers::register_patient(&mut store, Default::default(), req)?;
//! ```

pub mod gateway;
pub mod handlers;
pub mod store;
pub mod traits;

pub use gateway::{load_into, save_from};
pub use handlers::{HandlerOptions, Outcome};
pub use store::{RecordStore, UpsertOutcome};
pub use traits::SnapshotStore;

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{NaiveDate, Utc};

    use clinic_contracts::{
        amount::Amount,
        entity::{Appointment, Patient, Staff},
        error::{ClinicError, ClinicResult},
        persistence::{LoadMode, SnapshotReceipt},
    };

    use super::*;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// A snapshot store that hands back a fixed result and records saves.
    struct MockSnapshots {
        stored: Mutex<Option<RecordStore>>,
        fail: bool,
    }

    impl MockSnapshots {
        fn empty() -> Self {
            Self { stored: Mutex::new(None), fail: false }
        }

        fn holding(store: RecordStore) -> Self {
            Self { stored: Mutex::new(Some(store)), fail: false }
        }

        fn failing() -> Self {
            Self { stored: Mutex::new(None), fail: true }
        }
    }

    impl SnapshotStore for MockSnapshots {
        fn save(&self, store: &RecordStore) -> ClinicResult<SnapshotReceipt> {
            if self.fail {
                return Err(ClinicError::SnapshotIo {
                    path: "mock".to_string(),
                    reason: "disk full".to_string(),
                });
            }
            *self.stored.lock().unwrap() = Some(store.clone());
            Ok(SnapshotReceipt {
                snapshot_id: Default::default(),
                saved_at: Utc::now(),
                checksum: String::new(),
                counts: store.counts(),
            })
        }

        fn load(&self) -> ClinicResult<Option<RecordStore>> {
            if self.fail {
                return Err(ClinicError::SnapshotCorrupt {
                    reason: "unreadable".to_string(),
                });
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    fn populated() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_patient(Patient::new("P1", "Ada", "555-0100")).unwrap();
        store.ensure_records_for("P1");
        store.add_appointment(Appointment {
            patient_id: "P1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            doctor: "Dr. Who".to_string(),
            reason: "checkup".to_string(),
        });
        store
            .append_ehr_entry("P1", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "ok")
            .unwrap();
        store.append_charge("P1", "Consult", Amount::from_cents(1999)).unwrap();
        store.upsert_inventory("Syringe", 10, Amount::from_cents(75));
        store.add_staff(Staff {
            id: "S1".to_string(),
            name: "Grace".to_string(),
            role: "nurse".to_string(),
        });
        store
    }

    // ── RecordStore ──────────────────────────────────────────────────────────

    #[test]
    fn test_add_patient_rejects_empty_id() {
        let mut store = RecordStore::new();
        let err = store.add_patient(Patient::new("", "Ada", "")).unwrap_err();
        assert!(matches!(err, ClinicError::MissingField { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_linkage_comes_from_maps_not_patient_list() {
        let mut store = RecordStore::new();
        store.add_patient(Patient::new("P1", "Ada", "")).unwrap();
        assert!(!store.has_linked_records("P1"));

        store.ensure_records_for("P1");
        assert!(store.has_linked_records("P1"));
    }

    #[test]
    fn test_append_to_unknown_patient_fails() {
        let mut store = RecordStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(matches!(
            store.append_ehr_entry("ghost", date, "x"),
            Err(ClinicError::PatientNotFound { .. })
        ));
        assert!(matches!(
            store.append_charge("ghost", "x", Amount::from_cents(1)),
            Err(ClinicError::PatientNotFound { .. })
        ));
    }

    #[test]
    fn test_find_inventory_returns_first_case_insensitive_match() {
        let mut store = RecordStore::new();
        let created = store.upsert_inventory("Syringe", 5, Amount::from_cents(50));
        let updated = store.upsert_inventory("SYRINGE", 9, Amount::from_cents(99));
        assert_eq!(created, UpsertOutcome::Created);
        assert_eq!(updated, UpsertOutcome::Updated);

        let item = store.find_inventory_by_name("sYrInGe").unwrap();
        assert_eq!(item.quantity, 9);
        assert_eq!(item.unit_price, Amount::from_cents(50));
        assert!(store.find_inventory_by_name("gauze").is_none());
    }

    #[test]
    fn test_serialized_container_order_is_fixed() {
        let json = serde_json::to_string(&populated()).unwrap();
        let positions: Vec<usize> = [
            "\"patients\"",
            "\"appointments\"",
            "\"ehr\"",
            "\"billing\"",
            "\"inventory\"",
            "\"staff\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_restore_replace_is_idempotent() {
        let snapshot = populated();
        let mut store = RecordStore::new();

        store.restore(snapshot.clone(), LoadMode::Replace);
        store.restore(snapshot.clone(), LoadMode::Replace);

        assert_eq!(store, snapshot);
    }

    #[test]
    fn test_restore_merge_twice_duplicates_lists() {
        let snapshot = populated();
        let mut store = RecordStore::new();

        store.restore(snapshot.clone(), LoadMode::Merge);
        store.restore(snapshot, LoadMode::Merge);

        let counts = store.counts();
        assert_eq!(counts.patients, 2);
        assert_eq!(counts.appointments, 2);
        assert_eq!(counts.inventory_items, 2);
        assert_eq!(counts.staff, 2);
        // Keyed maps union rather than duplicate.
        assert_eq!(counts.ehr_records, 1);
        assert_eq!(counts.billing_records, 1);
    }

    #[test]
    fn test_check_integrity_detects_total_mismatch() {
        let json = serde_json::to_string(&populated())
            .unwrap()
            .replace("\"total\":\"19.99\"", "\"total\":\"5.00\"");
        let tampered: RecordStore = serde_json::from_str(&json).unwrap();

        let reason = tampered.check_integrity().unwrap_err();
        assert!(reason.contains("charges sum to 19.99"), "got: {reason}");
        assert!(populated().check_integrity().is_ok());
    }

    #[test]
    fn test_check_integrity_detects_unpaired_records() {
        let json = serde_json::to_string(&populated())
            .unwrap()
            .replace("\"billing\":{\"P1\"", "\"billing\":{\"P2\"");
        let tampered: RecordStore = serde_json::from_str(&json).unwrap();
        assert!(tampered.check_integrity().is_err());
    }

    // ── Gateway ──────────────────────────────────────────────────────────────

    #[test]
    fn test_save_then_load_round_trips() {
        let snapshots = MockSnapshots::empty();
        let original = populated();
        save_from(&original, &snapshots).unwrap();

        let mut fresh = RecordStore::new();
        let counts = load_into(&mut fresh, &snapshots, LoadMode::Replace)
            .unwrap()
            .unwrap();

        assert_eq!(counts, original.counts());
        assert_eq!(fresh, original);
    }

    #[test]
    fn test_load_without_snapshot_leaves_store_empty() {
        let mut store = RecordStore::new();
        let loaded = load_into(&mut store, &MockSnapshots::empty(), LoadMode::Replace).unwrap();
        assert!(loaded.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_load_leaves_store_untouched() {
        let mut store = populated();
        let before = store.clone();

        let err = load_into(&mut store, &MockSnapshots::failing(), LoadMode::Replace).unwrap_err();

        assert!(matches!(err, ClinicError::SnapshotCorrupt { .. }));
        assert_eq!(store, before);
    }

    #[test]
    fn test_load_rejects_inconsistent_snapshot() {
        let json = serde_json::to_string(&populated())
            .unwrap()
            .replace("\"total\":\"19.99\"", "\"total\":\"0.00\"");
        let bad: RecordStore = serde_json::from_str(&json).unwrap();

        let mut store = RecordStore::new();
        let err = load_into(&mut store, &MockSnapshots::holding(bad), LoadMode::Merge).unwrap_err();

        assert!(matches!(err, ClinicError::SnapshotCorrupt { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_is_reported() {
        let err = save_from(&populated(), &MockSnapshots::failing()).unwrap_err();
        assert!(matches!(err, ClinicError::SnapshotIo { .. }));
    }
}
