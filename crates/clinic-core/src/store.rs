//! The record store: six containers owned in one place.
//!
//! `RecordStore` is also the unit of persistence. It serializes with its
//! containers in a fixed order (patients, appointments, ehr, billing,
//! inventory, staff) so one snapshot captures the whole session.
//!
//! Patient existence for appointments, EHR updates and billing is decided
//! by membership in the EHR/Billing maps, never by scanning `patients`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use clinic_contracts::{
    amount::Amount,
    entity::{Appointment, InventoryItem, Patient, Staff},
    error::{ClinicError, ClinicResult},
    ledger::{Billing, Ehr},
    persistence::{LoadMode, StoreCounts},
};

/// Result of an inventory upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStore {
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    ehr: BTreeMap<String, Ehr>,
    billing: BTreeMap<String, Billing>,
    inventory: Vec<InventoryItem>,
    staff: Vec<Staff>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Patients ─────────────────────────────────────────────────────────────

    /// Append a patient. Identifiers must be non-empty; uniqueness is the
    /// caller's decision.
    pub fn add_patient(&mut self, patient: Patient) -> ClinicResult<()> {
        if patient.id.is_empty() {
            return Err(ClinicError::MissingField { field: "patient id" });
        }
        self.patients.push(patient);
        Ok(())
    }

    /// Create an empty EHR and an empty bill for `patient_id`, replacing any
    /// existing pair under that key.
    pub fn ensure_records_for(&mut self, patient_id: &str) {
        self.ehr.insert(patient_id.to_string(), Ehr::new(patient_id));
        self.billing
            .insert(patient_id.to_string(), Billing::new(patient_id));
    }

    /// Whether `patient_id` has linked EHR and billing records.
    pub fn has_linked_records(&self, patient_id: &str) -> bool {
        self.ehr.contains_key(patient_id) && self.billing.contains_key(patient_id)
    }

    pub fn has_patient_id(&self, patient_id: &str) -> bool {
        self.patients.iter().any(|p| p.id == patient_id)
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    // ── Appointments ─────────────────────────────────────────────────────────

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    // ── EHR ──────────────────────────────────────────────────────────────────

    pub fn append_ehr_entry(
        &mut self,
        patient_id: &str,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> ClinicResult<()> {
        let ehr = self
            .ehr
            .get_mut(patient_id)
            .ok_or_else(|| not_found(patient_id))?;
        ehr.add_entry(date, note);
        Ok(())
    }

    pub fn ehr(&self, patient_id: &str) -> Option<&Ehr> {
        self.ehr.get(patient_id)
    }

    // ── Billing ──────────────────────────────────────────────────────────────

    /// Append a charge and return the patient's new running total.
    pub fn append_charge(
        &mut self,
        patient_id: &str,
        description: impl Into<String>,
        amount: Amount,
    ) -> ClinicResult<Amount> {
        let billing = self
            .billing
            .get_mut(patient_id)
            .ok_or_else(|| not_found(patient_id))?;
        billing.add_charge(description, amount)
    }

    pub fn billing(&self, patient_id: &str) -> Option<&Billing> {
        self.billing.get(patient_id)
    }

    // ── Inventory ────────────────────────────────────────────────────────────

    /// First item whose name equals `name` ignoring case.
    pub fn find_inventory_by_name(&self, name: &str) -> Option<&InventoryItem> {
        let found = self.inventory.iter().find(|item| item.matches_name(name));
        debug!(name = %name, found = found.is_some(), "inventory lookup");
        found
    }

    /// Create the item if no case-insensitive match exists, otherwise
    /// overwrite its quantity and leave its name and price alone.
    pub fn upsert_inventory(
        &mut self,
        name: &str,
        quantity: u32,
        unit_price: Amount,
    ) -> UpsertOutcome {
        match self.inventory.iter_mut().find(|item| item.matches_name(name)) {
            Some(item) => {
                item.quantity = quantity;
                UpsertOutcome::Updated
            }
            None => {
                self.inventory.push(InventoryItem {
                    name: name.to_string(),
                    quantity,
                    unit_price,
                });
                UpsertOutcome::Created
            }
        }
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    // ── Staff ────────────────────────────────────────────────────────────────

    pub fn add_staff(&mut self, member: Staff) {
        self.staff.push(member);
    }

    pub fn has_staff_id(&self, staff_id: &str) -> bool {
        self.staff.iter().any(|s| s.id == staff_id)
    }

    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    // ── Whole-store ──────────────────────────────────────────────────────────

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            patients: self.patients.len(),
            appointments: self.appointments.len(),
            ehr_records: self.ehr.len(),
            billing_records: self.billing.len(),
            inventory_items: self.inventory.len(),
            staff: self.staff.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// Fold a loaded store into this one.
    ///
    /// `Replace` swaps the contents wholesale. `Merge` appends every list and
    /// unions both maps, with loaded entries winning on key collisions.
    pub fn restore(&mut self, loaded: RecordStore, mode: LoadMode) {
        match mode {
            LoadMode::Replace => *self = loaded,
            LoadMode::Merge => {
                self.patients.extend(loaded.patients);
                self.appointments.extend(loaded.appointments);
                self.ehr.extend(loaded.ehr);
                self.billing.extend(loaded.billing);
                self.inventory.extend(loaded.inventory);
                self.staff.extend(loaded.staff);
            }
        }
    }

    /// Check invariants that a hand-edited or damaged snapshot could break.
    ///
    /// Returns a description of the first violation found.
    pub fn check_integrity(&self) -> Result<(), String> {
        for (key, ehr) in &self.ehr {
            if &ehr.patient_id != key {
                return Err(format!("EHR keyed '{}' belongs to '{}'", key, ehr.patient_id));
            }
            if !self.billing.contains_key(key) {
                return Err(format!("EHR for '{}' has no billing record", key));
            }
        }
        for (key, billing) in &self.billing {
            if billing.patient_id() != key {
                return Err(format!(
                    "billing keyed '{}' belongs to '{}'",
                    key,
                    billing.patient_id()
                ));
            }
            if !self.ehr.contains_key(key) {
                return Err(format!("billing for '{}' has no EHR", key));
            }
            match billing.recomputed_total() {
                Some(sum) if sum == billing.total() => {}
                Some(sum) => {
                    return Err(format!(
                        "billing total for '{}' is {} but its charges sum to {}",
                        key,
                        billing.total(),
                        sum
                    ));
                }
                None => return Err(format!("billing charges for '{}' overflow", key)),
            }
        }
        Ok(())
    }
}

fn not_found(patient_id: &str) -> ClinicError {
    ClinicError::PatientNotFound {
        patient_id: patient_id.to_string(),
    }
}
