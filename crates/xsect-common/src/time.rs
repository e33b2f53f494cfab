//! Model timestamp handling.
//!
//! Model output carries its initialization and valid times as text such as
//! `2022-12-24T18:00:00.000000000`. Only the date and hour matter for a
//! cross section, so parsing keeps the first 13 characters (`%Y-%m-%dT%H`).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Number of leading characters holding `YYYY-MM-DDTHH`.
const HOUR_PREFIX_LEN: usize = 13;

/// Label format used on cross-section titles, e.g. `18z Dec 24, 2022`.
pub const LABEL_FORMAT: &str = "%Hz %b %d, %Y";

#[derive(Debug, Error, PartialEq)]
pub enum TimeParseError {
    #[error("timestamp too short: '{0}'")]
    TooShort(String),

    #[error("invalid timestamp format: '{0}'")]
    InvalidFormat(String),
}

/// Parse a model timestamp down to the hour (UTC).
pub fn parse_model_timestamp(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let s = s.trim();
    let prefix = s
        .get(..HOUR_PREFIX_LEN)
        .ok_or_else(|| TimeParseError::TooShort(s.to_string()))?;

    // chrono needs the minute field, the model string is truncated at the hour
    let ndt = NaiveDateTime::parse_from_str(&format!("{prefix}:00"), "%Y-%m-%dT%H:%M")
        .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

    Ok(Utc.from_utc_datetime(&ndt))
}

/// Format a time for a cross-section title.
pub fn format_label(time: &DateTime<Utc>) -> String {
    time.format(LABEL_FORMAT).to_string()
}
