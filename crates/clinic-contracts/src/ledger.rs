//! Per-patient append-only records: the health record and the bill.
//!
//! Both are created empty when a patient registers and only ever grow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{ClinicError, ClinicResult};

/// One dated free-text note in a patient's health record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EhrEntry {
    pub date: NaiveDate,
    pub note: String,
}

/// A patient's electronic health record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ehr {
    pub patient_id: String,
    /// Entries in the order they were added.
    pub entries: Vec<EhrEntry>,
}

impl Ehr {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, date: NaiveDate, note: impl Into<String>) {
        self.entries.push(EhrEntry {
            date,
            note: note.into(),
        });
    }
}

/// A single billed charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub description: String,
    pub amount: Amount,
}

/// A patient's bill: the charges in order plus their running total.
///
/// `total` is maintained on every append and always equals the sum of
/// `charges`. Fields are private so nothing can break that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Billing {
    patient_id: String,
    charges: Vec<Charge>,
    total: Amount,
}

impl Billing {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            charges: Vec::new(),
            total: Amount::ZERO,
        }
    }

    /// Append a charge and return the new total.
    ///
    /// Fails without appending if the total would overflow.
    pub fn add_charge(
        &mut self,
        description: impl Into<String>,
        amount: Amount,
    ) -> ClinicResult<Amount> {
        let total = self
            .total
            .checked_add(amount)
            .ok_or_else(|| ClinicError::InvalidAmount {
                input: amount.to_string(),
                reason: "running total would overflow".to_string(),
            })?;
        self.charges.push(Charge {
            description: description.into(),
            amount,
        });
        self.total = total;
        Ok(total)
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    /// Recompute the total from the charges, `None` on overflow. Used to
    /// validate loaded data.
    pub fn recomputed_total(&self) -> Option<Amount> {
        self.charges
            .iter()
            .try_fold(Amount::ZERO, |acc, c| acc.checked_add(c.amount))
    }
}
