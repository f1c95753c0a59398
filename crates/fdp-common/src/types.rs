//! Common types used across FDP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Production line assigned to machines created by ingestion before an
/// operator has classified them.
pub const DEFAULT_MACHINE_LINE: &str = "LineX";

/// Status assigned to machines created by ingestion.
pub const DEFAULT_MACHINE_STATUS: &str = "RUNNING";

/// A durable machine entity.
///
/// `name` is unique; `id` is stable once assigned. Machines are created by
/// the ingestion pipeline on first reference and never deleted by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Stable internal identifier
    pub id: i64,

    /// Human-readable machine name, unique across the plant
    pub name: String,

    /// Production line the machine belongs to
    pub line: String,

    /// Operational status (e.g., "RUNNING", "STOPPED")
    pub status: String,
}

/// Payload for creating a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMachine {
    pub name: String,
    pub line: String,
    pub status: String,
}

impl NewMachine {
    /// A machine shell for a name first seen during ingestion, with
    /// placeholder line and status.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: DEFAULT_MACHINE_LINE.to_string(),
            status: DEFAULT_MACHINE_STATUS.to_string(),
        }
    }
}

/// A durable event fact, ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub machine_id: i64,
    pub ts: DateTime<Utc>,
    pub event_type: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// A durable telemetry sample, ready for insertion.
///
/// Absent numeric readings stay `None` all the way to storage; they are
/// never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTelemetry {
    pub machine_id: i64,
    pub ts: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub vibration: Option<f64>,
    pub throughput: Option<f64>,
}
