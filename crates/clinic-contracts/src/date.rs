//! Calendar date parsing for appointments and health-record entries.

use chrono::NaiveDate;

use crate::error::{ClinicError, ClinicResult};

/// The one accepted textual date layout (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `input` as a calendar date.
///
/// Impossible dates such as `2024-02-30` are rejected; surrounding
/// whitespace is ignored.
pub fn parse_date(input: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ClinicError::InvalidDate {
        input: input.to_string(),
    })
}
