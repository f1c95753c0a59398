//! Ingestion orchestrator
//!
//! Drives one run: `Discover → {per file: Skip | Parse → Dedupe →
//! (Resolve + Persist)* → Mark} → Report`. Event files are processed before
//! telemetry files, each group in lexicographic name order, so runs are
//! reproducible.
//!
//! All inserts for one file happen in a single unit of work, and the file's
//! fingerprint marker is written only after that unit of work commits. A
//! failed file keeps its marker unset and stays eligible for the next run;
//! the run carries on with the remaining files.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::dedupe::dedupe;
use crate::parser::{parse_events, parse_telemetry};
use crate::record::RawRecord;
use crate::resolve::resolve_machine_id;
use crate::state::FileStateTracker;
use crate::store::IngestStore;
use fdp_common::{FdpError, Result};

/// Naming convention for event drops.
pub const EVENT_FILE_PREFIX: &str = "events_";
/// Naming convention for telemetry drops.
pub const TELEMETRY_FILE_PREFIX: &str = "telemetry_";

const EVENT_FILE_SUFFIX: &str = ".csv";
const TELEMETRY_FILE_SUFFIX: &str = ".json";

/// Kind of a discovered source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Events,
    Telemetry,
}

/// A source file discovered in the data directory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub kind: SourceKind,
}

/// Outcome for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Unit of work committed and marker recorded.
    Ingested { inserted: usize, duplicates: usize },
    /// Fingerprint matched the marker; the file was not parsed.
    Skipped,
    /// Parse or storage failure; the marker was left unset.
    Failed { reason: String },
}

/// Per-file outcome within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
}

/// Aggregate outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Records inserted across all ingested files.
    pub fn inserted(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                FileStatus::Ingested { inserted, .. } => inserted,
                _ => 0,
            })
            .sum()
    }

    /// Duplicate records dropped across all ingested files.
    pub fn duplicates(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                FileStatus::Ingested { duplicates, .. } => duplicates,
                _ => 0,
            })
            .sum()
    }

    pub fn ingested_files(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Ingested { .. }))
    }

    pub fn skipped_files(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped))
    }

    pub fn failed_files(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// The ingestion pipeline for one data directory and store.
pub struct IngestPipeline<S: IngestStore> {
    data_dir: PathBuf,
    tracker: FileStateTracker,
    store: S,
}

impl<S: IngestStore> IngestPipeline<S> {
    /// Build a pipeline, creating the state directory if needed.
    pub fn new(config: IngestConfig, store: S) -> Result<Self> {
        let tracker = FileStateTracker::open(&config.state_dir)?;
        Ok(Self {
            data_dir: config.data_dir,
            tracker,
            store,
        })
    }

    /// Execute one run over the data directory.
    ///
    /// Errors only on configuration problems (missing data directory);
    /// per-file failures are reported, logged, and do not stop the run.
    pub async fn run(&self) -> Result<RunReport> {
        if !self.data_dir.is_dir() {
            return Err(FdpError::Config(format!(
                "data directory does not exist: {}",
                self.data_dir.display()
            )));
        }

        let files = discover_files(&self.data_dir)?;
        info!(files = files.len(), dir = %self.data_dir.display(), "Discovered source files");

        let mut report = RunReport::default();
        for file in files {
            let status = match self.ingest_file(&file).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(file = %file.name, error = %err, "File ingestion failed");
                    FileStatus::Failed {
                        reason: err.to_string(),
                    }
                },
            };
            report.files.push(FileReport {
                file: file.name,
                status,
            });
        }

        info!(
            ingested = report.ingested_files(),
            skipped = report.skipped_files(),
            failed = report.failed_files(),
            inserted = report.inserted(),
            duplicates = report.duplicates(),
            "Ingestion run complete"
        );
        for file in &report.files {
            if let FileStatus::Failed { reason } = &file.status {
                warn!(file = %file.file, reason = %reason, "File left unprocessed; fix and re-run");
            }
        }

        Ok(report)
    }

    async fn ingest_file(&self, file: &SourceFile) -> Result<FileStatus> {
        let fingerprint = FileStateTracker::fingerprint(&file.path)?;
        if self.tracker.is_processed(&file.name, &fingerprint)? {
            info!(file = %file.name, "Skipping already processed file");
            return Ok(FileStatus::Skipped);
        }

        let data = std::fs::read(&file.path)?;
        let raw = match file.kind {
            SourceKind::Events => parse_events(&data)?,
            SourceKind::Telemetry => parse_telemetry(&data)?,
        };
        let raw_count = raw.len();
        let records = dedupe(raw);
        let duplicates = raw_count - records.len();

        let mut txn = self.store.begin().await?;
        let mut inserted = 0usize;
        for record in &records {
            let machine_id = resolve_machine_id(txn.as_mut(), record.machine_name()).await?;
            match record {
                RawRecord::Event(event) => {
                    txn.insert_event(&event.to_new_event(machine_id)).await?;
                },
                RawRecord::Telemetry(sample) => {
                    txn.insert_telemetry(&sample.to_new_telemetry(machine_id)).await?;
                },
            }
            inserted += 1;
        }
        txn.commit().await?;

        // Marker only after the unit of work is durable.
        self.tracker.mark_processed(&file.name, &fingerprint)?;

        info!(file = %file.name, inserted, duplicates, "File ingested");
        Ok(FileStatus::Ingested {
            inserted,
            duplicates,
        })
    }
}

/// Scan the data directory for source files matching the naming conventions.
///
/// Returns all event files, then all telemetry files, each group sorted by
/// name.
fn discover_files(data_dir: &Path) -> Result<Vec<SourceFile>> {
    let mut events = Vec::new();
    let mut telemetry = Vec::new();

    for entry in std::fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };

        if name.starts_with(EVENT_FILE_PREFIX) && name.ends_with(EVENT_FILE_SUFFIX) {
            events.push(SourceFile {
                path,
                name,
                kind: SourceKind::Events,
            });
        } else if name.starts_with(TELEMETRY_FILE_PREFIX) && name.ends_with(TELEMETRY_FILE_SUFFIX)
        {
            telemetry.push(SourceFile {
                path,
                name,
                kind: SourceKind::Telemetry,
            });
        }
    }

    events.sort_by(|a, b| a.name.cmp(&b.name));
    telemetry.sort_by(|a, b| a.name.cmp(&b.name));
    events.append(&mut telemetry);
    Ok(events)
}
