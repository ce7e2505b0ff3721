//! Event date parsing.

use chrono::{DateTime, NaiveDateTime, Utc};
use orla_core::DomainError;

/// Parse an ISO-8601 date string into a timezone-aware timestamp.
///
/// Accepts both offset-carrying strings (`2025-07-01T10:00:00-03:00`,
/// trailing `Z`) and naive strings (`2025-07-01T10:00:00`, optional
/// fractional seconds). Naive strings are taken as UTC.
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| DomainError::InvalidDateFormat)
}
