//! Event file parser
//!
//! Event drops are header-bearing CSV with columns `MachineName`, `Type`,
//! `Ts` (required) and `Code`, `Message` (optional, may be empty).

use serde::Deserialize;

use crate::parser::{normalize_optional, parse_timestamp};
use crate::record::{EventRecord, RawRecord};
use fdp_common::{FdpError, Result};

#[derive(Debug, Deserialize)]
struct EventRow {
    #[serde(rename = "MachineName")]
    machine_name: String,

    #[serde(rename = "Type")]
    event_type: String,

    #[serde(rename = "Ts")]
    ts: String,

    #[serde(rename = "Code", default)]
    code: Option<String>,

    #[serde(rename = "Message", default)]
    message: Option<String>,
}

/// Parse a full event CSV file into normalized records.
///
/// Names and free text are trimmed, the event type is uppercased, and empty
/// optional columns become `None`. The first malformed row fails the parse.
pub fn parse_events(data: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<EventRow>().enumerate() {
        let row =
            row.map_err(|e| FdpError::Parse(format!("event row {}: {e}", index + 1)))?;

        let machine_name = row.machine_name.trim().to_string();
        if machine_name.is_empty() {
            return Err(FdpError::Parse(format!("event row {}: empty MachineName", index + 1)));
        }

        let event_type = row.event_type.trim().to_uppercase();
        if event_type.is_empty() {
            return Err(FdpError::Parse(format!("event row {}: empty Type", index + 1)));
        }

        let ts = parse_timestamp(&row.ts)
            .map_err(|e| FdpError::Parse(format!("event row {}: {e}", index + 1)))?;

        records.push(RawRecord::Event(EventRecord {
            machine_name,
            ts,
            event_type,
            code: normalize_optional(row.code),
            message: normalize_optional(row.message),
        }));
    }

    Ok(records)
}
