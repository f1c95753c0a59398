//! File state tracking
//!
//! A side-channel marker store records one SHA-256 fingerprint per source
//! file *name* (`<file name>.sha256` under the state directory). A file is
//! fully ingested iff its current fingerprint equals the recorded one; any
//! mismatch forces re-ingestion of the whole file. There is no partial-file
//! resume.
//!
//! Checking and recording are deliberately separate steps: the orchestrator
//! writes the marker only after the file's storage transaction has
//! committed. A file that fails mid-ingestion keeps its old marker (or none)
//! and is retried on the next run.

use std::path::{Path, PathBuf};

use fdp_common::checksum::compute_file_sha256;
use fdp_common::Result;

/// Marker store over a local state directory.
#[derive(Debug, Clone)]
pub struct FileStateTracker {
    state_dir: PathBuf,
}

impl FileStateTracker {
    /// Open the marker store, creating the state directory if needed.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir)?;
        Ok(Self { state_dir })
    }

    /// Compute the fingerprint of a source file's current content.
    pub fn fingerprint(path: impl AsRef<Path>) -> Result<String> {
        compute_file_sha256(path)
    }

    /// Whether the recorded fingerprint for `file_name` matches `fingerprint`.
    ///
    /// Pure read; never touches the marker.
    pub fn is_processed(&self, file_name: &str, fingerprint: &str) -> Result<bool> {
        match std::fs::read_to_string(self.marker_path(file_name)) {
            Ok(recorded) => Ok(recorded.trim() == fingerprint),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Record `fingerprint` as the last fully ingested content of `file_name`.
    ///
    /// Written via a temporary file and rename so a crash cannot leave a torn
    /// marker behind.
    pub fn mark_processed(&self, file_name: &str, fingerprint: &str) -> Result<()> {
        let marker = self.marker_path(file_name);
        let tmp = marker.with_extension("sha256.tmp");
        std::fs::write(&tmp, fingerprint)?;
        std::fs::rename(&tmp, &marker)?;
        Ok(())
    }

    fn marker_path(&self, file_name: &str) -> PathBuf {
        self.state_dir.join(format!("{file_name}.sha256"))
    }
}
