//! Operation handlers: one per menu action.
//!
//! Each handler takes the raw text the operator typed, validates it, applies
//! at most one logical mutation to the store, and returns an `Outcome` whose
//! `Display` is the message shown to the operator. A validation error means
//! the store was not touched.

use std::fmt;

use chrono::NaiveDate;
use tracing::{info, warn};

use clinic_contracts::{
    amount::Amount,
    date::parse_date,
    entity::{Appointment, Patient, Staff},
    error::{ClinicError, ClinicResult},
};

use crate::store::{RecordStore, UpsertOutcome};

/// Switches that change how strictly handlers validate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Reject patient and staff registrations that reuse a known identifier.
    pub reject_duplicate_ids: bool,
}

/// What a successful handler did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    PatientRegistered { patient_id: String },
    AppointmentScheduled { patient_id: String, date: NaiveDate },
    EhrUpdated { patient_id: String },
    ChargeAdded { patient_id: String, total: Amount },
    InventoryAdded { name: String },
    InventoryUpdated { name: String, quantity: u32 },
    StaffRegistered { staff_id: String },
}

impl Outcome {
    /// The operator-facing message, with money shown after `currency_symbol`.
    pub fn render(&self, currency_symbol: &str) -> String {
        match self {
            Outcome::PatientRegistered { .. } => "Patient registered successfully.".to_string(),
            Outcome::AppointmentScheduled { .. } => {
                "Appointment scheduled successfully.".to_string()
            }
            Outcome::EhrUpdated { .. } => "EHR updated successfully.".to_string(),
            Outcome::ChargeAdded { total, .. } => format!(
                "Charge added successfully. Total amount: {}{}",
                currency_symbol, total
            ),
            Outcome::InventoryAdded { .. } => "Inventory item added successfully.".to_string(),
            Outcome::InventoryUpdated { .. } => "Inventory updated successfully.".to_string(),
            Outcome::StaffRegistered { .. } => "Staff registered successfully.".to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("$"))
    }
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct RegisterPatient<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub contact_info: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleAppointment<'a> {
    pub patient_id: &'a str,
    pub date: &'a str,
    pub doctor: &'a str,
    pub reason: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateEhr<'a> {
    pub patient_id: &'a str,
    pub date: &'a str,
    pub note: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct AddCharge<'a> {
    pub patient_id: &'a str,
    pub description: &'a str,
    pub amount: &'a str,
}

/// `price` is only consulted when `name` is not yet stocked.
#[derive(Debug, Clone, Copy)]
pub struct ManageInventory<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub price: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct RegisterStaff<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// Fail with `PatientNotFound` unless `patient_id` has linked records.
pub fn require_patient(store: &RecordStore, patient_id: &str) -> ClinicResult<()> {
    if store.has_linked_records(patient_id) {
        Ok(())
    } else {
        Err(ClinicError::PatientNotFound {
            patient_id: patient_id.to_string(),
        })
    }
}

/// Register a patient together with an empty EHR and an empty bill.
pub fn register_patient(
    store: &mut RecordStore,
    options: HandlerOptions,
    req: RegisterPatient<'_>,
) -> ClinicResult<Outcome> {
    if req.id.is_empty() {
        return Err(ClinicError::MissingField { field: "patient id" });
    }
    if req.name.is_empty() {
        return Err(ClinicError::MissingField { field: "patient name" });
    }

    if store.has_patient_id(req.id) || store.has_linked_records(req.id) {
        if options.reject_duplicate_ids {
            return Err(ClinicError::DuplicateId {
                kind: "patient",
                id: req.id.to_string(),
            });
        }
        warn!(
            patient_id = %req.id,
            "registering duplicate patient id; linked EHR and billing are reset"
        );
    }

    store.add_patient(Patient::new(req.id, req.name, req.contact_info))?;
    store.ensure_records_for(req.id);

    info!(patient_id = %req.id, "patient registered");
    Ok(Outcome::PatientRegistered {
        patient_id: req.id.to_string(),
    })
}

pub fn schedule_appointment(
    store: &mut RecordStore,
    req: ScheduleAppointment<'_>,
) -> ClinicResult<Outcome> {
    require_patient(store, req.patient_id)?;
    let date = parse_date(req.date)?;

    store.add_appointment(Appointment {
        patient_id: req.patient_id.to_string(),
        date,
        doctor: req.doctor.to_string(),
        reason: req.reason.to_string(),
    });

    info!(patient_id = %req.patient_id, date = %date, "appointment scheduled");
    Ok(Outcome::AppointmentScheduled {
        patient_id: req.patient_id.to_string(),
        date,
    })
}

pub fn update_ehr(store: &mut RecordStore, req: UpdateEhr<'_>) -> ClinicResult<Outcome> {
    require_patient(store, req.patient_id)?;
    let date = parse_date(req.date)?;

    store.append_ehr_entry(req.patient_id, date, req.note)?;

    info!(patient_id = %req.patient_id, date = %date, "EHR entry appended");
    Ok(Outcome::EhrUpdated {
        patient_id: req.patient_id.to_string(),
    })
}

/// Append a charge and report the patient's new running total.
pub fn add_charge(store: &mut RecordStore, req: AddCharge<'_>) -> ClinicResult<Outcome> {
    require_patient(store, req.patient_id)?;
    let amount: Amount = req.amount.parse()?;

    let total = store.append_charge(req.patient_id, req.description, amount)?;

    info!(
        patient_id = %req.patient_id,
        amount = %amount,
        total = %total,
        "charge added"
    );
    Ok(Outcome::ChargeAdded {
        patient_id: req.patient_id.to_string(),
        total,
    })
}

/// Create a stock line, or overwrite the quantity of an existing one.
pub fn manage_inventory(
    store: &mut RecordStore,
    req: ManageInventory<'_>,
) -> ClinicResult<Outcome> {
    if req.name.is_empty() {
        return Err(ClinicError::MissingField { field: "item name" });
    }
    let quantity = parse_quantity(req.quantity)?;

    let unit_price = if store.find_inventory_by_name(req.name).is_some() {
        Amount::ZERO
    } else {
        let raw = req.price.ok_or(ClinicError::MissingField { field: "price" })?;
        let price: Amount = raw.parse()?;
        if price.is_negative() {
            return Err(ClinicError::InvalidAmount {
                input: raw.to_string(),
                reason: "price must not be negative".to_string(),
            });
        }
        price
    };

    let outcome = match store.upsert_inventory(req.name, quantity, unit_price) {
        UpsertOutcome::Created => Outcome::InventoryAdded {
            name: req.name.to_string(),
        },
        UpsertOutcome::Updated => Outcome::InventoryUpdated {
            name: req.name.to_string(),
            quantity,
        },
    };

    info!(item = %req.name, quantity, "inventory upserted");
    Ok(outcome)
}

pub fn register_staff(
    store: &mut RecordStore,
    options: HandlerOptions,
    req: RegisterStaff<'_>,
) -> ClinicResult<Outcome> {
    if store.has_staff_id(req.id) {
        if options.reject_duplicate_ids {
            return Err(ClinicError::DuplicateId {
                kind: "staff",
                id: req.id.to_string(),
            });
        }
        warn!(staff_id = %req.id, "registering duplicate staff id");
    }

    store.add_staff(Staff {
        id: req.id.to_string(),
        name: req.name.to_string(),
        role: req.role.to_string(),
    });

    info!(staff_id = %req.id, role = %req.role, "staff registered");
    Ok(Outcome::StaffRegistered {
        staff_id: req.id.to_string(),
    })
}

/// Parse a non-negative whole-number quantity.
pub fn parse_quantity(input: &str) -> ClinicResult<u32> {
    input
        .trim()
        .parse()
        .map_err(|_| ClinicError::InvalidQuantity {
            input: input.to_string(),
        })
}

// ── Tests ────────────────────────────────────────────────────────────────────
