//! Exact money values.
//!
//! `Amount` is a fixed-point number of hundredths (cents) so that running
//! totals never drift the way binary floating point does: 19.99 + 0.02 is
//! exactly 20.01. It serializes as its decimal string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ClinicError;

/// Number of fractional digits carried by an `Amount`.
pub const FRACTION_DIGITS: usize = 2;

const SCALE: i64 = 100;

/// A signed money value with two fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn cents(self) -> i64 {
        self.cents
    }

    pub fn is_negative(self) -> bool {
        self.cents < 0
    }

    /// Add two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.cents.checked_add(rhs.cents).map(Amount::from_cents)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        let scale = SCALE as u64;
        write!(f, "{}{}.{:02}", sign, abs / scale, abs % scale)
    }
}

impl FromStr for Amount {
    type Err = ClinicError;

    /// Parse decimal text such as `"19.99"`, `"5"`, `"-3.5"` or `".25"`.
    ///
    /// More than two fractional digits is rejected rather than rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| ClinicError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected a number"));
        }
        if fraction.len() > FRACTION_DIGITS {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("value is too large"))?
        };
        // Right-pad so "5" means 50 cents and "05" means 5 cents.
        let fraction_value: i64 = if fraction.is_empty() {
            0
        } else {
            format!("{:0<width$}", fraction, width = FRACTION_DIGITS)
                .parse()
                .map_err(|_| invalid("expected a number"))?
        };

        let cents = whole_value
            .checked_mul(SCALE)
            .and_then(|c| c.checked_add(fraction_value))
            .ok_or_else(|| invalid("value is too large"))?;

        Ok(Amount::from_cents(if negative { -cents } else { cents }))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
