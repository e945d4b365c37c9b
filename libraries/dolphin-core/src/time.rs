//! Timestamp helpers
//!
//! Timestamps are persisted as Unix epoch milliseconds.

use crate::error::{CrmError, Result};
use chrono::{DateTime, Utc};

/// Convert stored epoch milliseconds back into a UTC timestamp
pub fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CrmError::storage(format!("Invalid timestamp: {millis}")))
}

/// Human-readable date and time, e.g. `Jan 5, 2025 at 3:04 PM`
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y at %-I:%M %p").to_string()
}

/// Human-readable date, e.g. `Jan 5, 2025`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}
