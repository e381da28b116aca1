//! Version marker carried by every delta.
//!
//! The marker is the delta source's timestamp at microsecond precision.
//! It is stored on the document as a fixed-width `yyyyMMddHHmmssSSSSSS`
//! string, which sorts lexically in the same order as chronologically.

use crate::error::{ModelError, ModelResult};
use chrono::{DateTime, NaiveDate, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the encoded marker.
const ENCODED_LEN: usize = 20;

/// Ordering token of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionMarker(DateTime<Utc>);

impl VersionMarker {
    /// Creates a marker from any timezone-aware timestamp.
    ///
    /// The timestamp is normalised to UTC and truncated to microseconds.
    pub fn from_datetime<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Self(at.with_timezone(&Utc).trunc_subsecs(6))
    }

    /// Parses the 20-digit encoded form.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidVersionMarker`] if the input is not
    /// exactly twenty ASCII digits or does not name a real instant.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let invalid = || ModelError::InvalidVersionMarker(raw.to_string());
        let digits = raw.as_bytes();
        if digits.len() != ENCODED_LEN || !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let field = |start: usize, end: usize| {
            digits[start..end]
                .iter()
                .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'))
        };

        let year = i32::try_from(field(0, 4)).map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, field(4, 6), field(6, 8))
            .and_then(|date| {
                date.and_hms_micro_opt(field(8, 10), field(10, 12), field(12, 14), field(14, 20))
            })
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(invalid)
    }

    /// Returns the encoded `yyyyMMddHHmmssSSSSSS` form.
    pub fn encode(&self) -> String {
        format!(
            "{}{:06}",
            self.0.format("%Y%m%d%H%M%S"),
            self.0.timestamp_subsec_micros()
        )
    }

    /// Returns the marker as a UTC timestamp.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for VersionMarker {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionMarker {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        Self::parse(&value)
    }
}

impl From<VersionMarker> for String {
    fn from(value: VersionMarker) -> Self {
        value.encode()
    }
}
