//! Configuration schema and loading.
//!
//! Every key is optional; a missing file section falls back to the
//! defaults below. Unknown keys are rejected so a typo does not silently
//! fall back to a default.
//!
//! Example:
//! ```toml
//! data_file = "hospitalData.json"
//! load_mode = "replace"          # or "merge"
//! reject_duplicate_ids = false
//! currency_symbol = "$"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use clinic_contracts::{
    error::{ClinicError, ClinicResult},
    persistence::LoadMode,
};
use clinic_core::HandlerOptions;

/// Snapshot file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "hospitalData.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClinicConfig {
    /// Where snapshots are saved and loaded.
    pub data_file: PathBuf,

    /// How the startup load combines the snapshot with the (empty) store.
    pub load_mode: LoadMode,

    /// Reject patient and staff registrations that reuse an identifier.
    pub reject_duplicate_ids: bool,

    /// Printed before money amounts.
    pub currency_symbol: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            load_mode: LoadMode::Replace,
            reject_duplicate_ids: false,
            currency_symbol: "$".to_string(),
        }
    }
}

impl ClinicConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `ClinicError::ConfigError` if the TOML is malformed or has
    /// keys or values this schema does not know.
    pub fn from_toml_str(s: &str) -> ClinicResult<Self> {
        toml::from_str(s).map_err(|e| ClinicError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the config file at `path`.
    pub fn from_file(path: &Path) -> ClinicResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClinicError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            reject_duplicate_ids: self.reject_duplicate_ids,
        }
    }
}
