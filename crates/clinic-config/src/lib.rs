//! # clinic-config
//!
//! TOML configuration for the clinic record keeper: where snapshots live,
//! how they are loaded, how strictly identifiers are checked, and how money
//! is shown.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use clinic_config::ClinicConfig;
//!
//! let config = ClinicConfig::from_file(Path::new("clinic.toml"))?;
//! ```

pub mod config;

pub use config::{ClinicConfig, DEFAULT_DATA_FILE};

// ── Tests ─────────────────────────────────────────────────────────────────────
