//! # clinic-contracts
//!
//! Shared record types, money and date parsing, and errors for the clinic
//! record store.
//!
//! All crates in the workspace import from here. No store logic lives in
//! this crate, only data definitions, parsing, and error types.

pub mod amount;
pub mod date;
pub mod entity;
pub mod error;
pub mod ledger;
pub mod persistence;

pub use amount::Amount;
pub use date::{parse_date, DATE_FORMAT};
pub use entity::{Appointment, InventoryItem, Patient, Staff};
pub use error::{ClinicError, ClinicResult};
pub use ledger::{Billing, Charge, Ehr, EhrEntry};
pub use persistence::{LoadMode, SnapshotReceipt, StoreCounts};
