//! Telemetry file parser
//!
//! Telemetry drops are a JSON array of objects with keys `MachineName`, `Ts`
//! (required) and `Temperature`, `Vibration`, `Throughput` (optional
//! numerics). Absent or null readings stay absent; they are never coerced to
//! zero.

use serde::Deserialize;

use crate::parser::parse_timestamp;
use crate::record::{RawRecord, TelemetryRecord};
use fdp_common::{FdpError, Result};

#[derive(Debug, Deserialize)]
struct TelemetryObject {
    #[serde(rename = "MachineName")]
    machine_name: String,

    #[serde(rename = "Ts")]
    ts: String,

    #[serde(rename = "Temperature", default)]
    temperature: Option<f64>,

    #[serde(rename = "Vibration", default)]
    vibration: Option<f64>,

    #[serde(rename = "Throughput", default)]
    throughput: Option<f64>,
}

/// Parse a full telemetry JSON file into normalized records.
pub fn parse_telemetry(data: &[u8]) -> Result<Vec<RawRecord>> {
    let objects: Vec<TelemetryObject> = serde_json::from_slice(data)
        .map_err(|e| FdpError::Parse(format!("telemetry file: {e}")))?;

    let mut records = Vec::new();
    for (index, object) in objects.into_iter().enumerate() {
        let machine_name = object.machine_name.trim().to_string();
        if machine_name.is_empty() {
            return Err(FdpError::Parse(format!(
                "telemetry entry {}: empty MachineName",
                index + 1
            )));
        }

        let ts = parse_timestamp(&object.ts)
            .map_err(|e| FdpError::Parse(format!("telemetry entry {}: {e}", index + 1)))?;

        records.push(RawRecord::Telemetry(TelemetryRecord {
            machine_name,
            ts,
            temperature: object.temperature,
            vibration: object.vibration,
            throughput: object.throughput,
        }));
    }

    Ok(records)
}
