//! Ingestion run configuration

use std::path::PathBuf;

/// Configuration for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Directory scanned for `events_*.csv` and `telemetry_*.json` drops
    pub data_dir: PathBuf,

    /// Directory holding per-file fingerprint markers, separate from the
    /// main store
    pub state_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            state_dir: PathBuf::from(".etl_state"),
        }
    }
}
