//! Plain record types owned by the record store.
//!
//! These carry data only. Patients, appointments and staff are never
//! mutated after creation; inventory items change quantity in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// A registered patient. `id` is the join key for EHR and billing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub contact_info: String,
}

impl Patient {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        contact_info: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact_info: contact_info.into(),
        }
    }
}

/// A booked appointment. The patient's existence is checked only when it
/// is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient_id: String,
    pub date: NaiveDate,
    pub doctor: String,
    pub reason: String,
}

/// A stock line. `name` is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Amount,
}

impl InventoryItem {
    /// True if `name` refers to this item, ignoring case.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub role: String,
}
