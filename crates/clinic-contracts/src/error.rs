//! Error types for the clinic record store.
//!
//! Every fallible operation returns `ClinicResult<T>`. Validation variants
//! are reported to the operator and never leave the store half-mutated;
//! snapshot variants are reported and logged but never end the session.

use thiserror::Error;

/// The unified error type for the clinic workspace.
#[derive(Debug, Error)]
pub enum ClinicError {
    /// No EHR/Billing linkage exists for the given patient identifier.
    #[error("patient '{patient_id}' not found")]
    PatientNotFound { patient_id: String },

    /// A date did not parse as a calendar date in `yyyy-MM-dd` form.
    #[error("invalid date '{input}': expected yyyy-MM-dd")]
    InvalidDate { input: String },

    /// A money value could not be parsed or is out of range.
    #[error("invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// A quantity was not a non-negative whole number.
    #[error("invalid quantity '{input}': expected a non-negative whole number")]
    InvalidQuantity { input: String },

    /// A required field was left empty.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },

    /// An identifier is already in use and duplicates are being rejected.
    #[error("{kind} id '{id}' is already registered")]
    DuplicateId { kind: &'static str, id: String },

    /// The snapshot file could not be read, written, or replaced.
    #[error("snapshot I/O failed for '{path}': {reason}")]
    SnapshotIo { path: String, reason: String },

    /// The snapshot was readable but its contents cannot be trusted.
    #[error("snapshot is corrupt: {reason}")]
    SnapshotCorrupt { reason: String },

    /// The configuration file is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl ClinicError {
    /// True for errors caused by operator input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClinicError::PatientNotFound { .. }
                | ClinicError::InvalidDate { .. }
                | ClinicError::InvalidAmount { .. }
                | ClinicError::InvalidQuantity { .. }
                | ClinicError::MissingField { .. }
                | ClinicError::DuplicateId { .. }
        )
    }
}

/// Convenience alias used throughout the clinic crates.
pub type ClinicResult<T> = Result<T, ClinicError>;
