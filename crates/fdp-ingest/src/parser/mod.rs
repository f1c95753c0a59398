//! Format parsers for the two source file kinds
//!
//! Both parsers take the full file content and produce normalized
//! [`RawRecord`](crate::record::RawRecord)s. A single malformed record fails
//! the whole parse; the orchestrator treats that as a failure of the file,
//! leaving its marker unset so the fixed file is picked up on the next run.

pub mod events;
pub mod telemetry;

pub use events::parse_events;
pub use telemetry::parse_telemetry;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use fdp_common::{FdpError, Result};

/// Parse a timestamp from a restricted ISO-8601 subset.
///
/// Accepts RFC 3339 (a trailing `Z` is UTC) and naive
/// `YYYY-MM-DDTHH:MM:SS[.frac]` forms, which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(FdpError::Parse(format!("bad timestamp: {raw}")))
}

/// Trim an optional free-text field, collapsing empty values to absent.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
