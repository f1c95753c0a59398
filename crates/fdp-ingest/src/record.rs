//! Parsed record shapes
//!
//! One `RawRecord` is a single normalized line/entry from a source file. It
//! exists only for the duration of that file's processing pass; the durable
//! shapes live in `fdp_common::types`.

use chrono::{DateTime, Utc};
use fdp_common::checksum::hash_fields;
use fdp_common::types::{NewEvent, NewTelemetry};

/// One parsed entry from a source file, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Event(EventRecord),
    Telemetry(TelemetryRecord),
}

/// A normalized event row from a CSV drop.
///
/// Fields are already normalized by the parser: names and free text trimmed,
/// the type uppercased, empty optionals collapsed to `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub machine_name: String,
    pub ts: DateTime<Utc>,
    pub event_type: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// A normalized telemetry object from a JSON drop.
///
/// Absent numeric readings are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub machine_name: String,
    pub ts: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub vibration: Option<f64>,
    pub throughput: Option<f64>,
}

impl RawRecord {
    /// The machine name this record references.
    pub fn machine_name(&self) -> &str {
        match self {
            RawRecord::Event(e) => &e.machine_name,
            RawRecord::Telemetry(t) => &t.machine_name,
        }
    }

    /// Deterministic digest over the record's normalized fields in a fixed
    /// order. Two records with identical content hash identically; the kind
    /// tag keeps event and telemetry signatures in disjoint spaces.
    pub fn content_signature(&self) -> String {
        match self {
            RawRecord::Event(e) => {
                let ts = e.ts.to_rfc3339();
                hash_fields([
                    "event",
                    e.machine_name.as_str(),
                    e.event_type.as_str(),
                    e.code.as_deref().unwrap_or(""),
                    e.message.as_deref().unwrap_or(""),
                    ts.as_str(),
                ])
            },
            RawRecord::Telemetry(t) => {
                let ts = t.ts.to_rfc3339();
                let temperature = format_reading(t.temperature);
                let vibration = format_reading(t.vibration);
                let throughput = format_reading(t.throughput);
                hash_fields([
                    "telemetry",
                    t.machine_name.as_str(),
                    ts.as_str(),
                    temperature.as_str(),
                    vibration.as_str(),
                    throughput.as_str(),
                ])
            },
        }
    }
}

impl EventRecord {
    /// Bind the record to a resolved machine id, producing the durable shape.
    pub fn to_new_event(&self, machine_id: i64) -> NewEvent {
        NewEvent {
            machine_id,
            ts: self.ts,
            event_type: self.event_type.clone(),
            code: self.code.clone(),
            message: self.message.clone(),
        }
    }
}

impl TelemetryRecord {
    /// Bind the record to a resolved machine id, producing the durable shape.
    pub fn to_new_telemetry(&self, machine_id: i64) -> NewTelemetry {
        NewTelemetry {
            machine_id,
            ts: self.ts,
            temperature: self.temperature,
            vibration: self.vibration,
            throughput: self.throughput,
        }
    }
}

fn format_reading(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
