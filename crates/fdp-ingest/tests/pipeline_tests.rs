//! End-to-end pipeline tests over a temp data directory and in-memory store.

use fdp_ingest::config::IngestConfig;
use fdp_ingest::pipeline::{FileStatus, IngestPipeline, RunReport};
use fdp_ingest::store::MemoryStore;
use fdp_common::FdpError;
use tempfile::TempDir;

struct Fixture {
    data: TempDir,
    state: TempDir,
    store: MemoryStore,
}

impl Fixture {
    fn new() -> Self {
        Self {
            data: tempfile::tempdir().unwrap(),
            state: tempfile::tempdir().unwrap(),
            store: MemoryStore::new(),
        }
    }

    fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.data.path().join(name), contents).unwrap();
    }

    async fn run(&self) -> RunReport {
        let pipeline = IngestPipeline::new(
            IngestConfig {
                data_dir: self.data.path().to_path_buf(),
                state_dir: self.state.path().to_path_buf(),
            },
            self.store.clone(),
        )
        .unwrap();
        pipeline.run().await.unwrap()
    }

    fn marker_exists(&self, file: &str) -> bool {
        self.state.path().join(format!("{file}.sha256")).exists()
    }
}

fn status_of<'a>(report: &'a RunReport, file: &str) -> &'a FileStatus {
    &report
        .files
        .iter()
        .find(|f| f.file == file)
        .unwrap_or_else(|| panic!("no report entry for {file}"))
        .status
}

const EVENTS_WITH_DUPLICATE: &str = "\
MachineName,Type,Ts,Code,Message
M-100,FAULT,2025-01-01T08:00:00Z,E42,Jam detected
 M-100 , fault ,2025-01-01T08:00:00Z,E42, Jam detected
";

#[tokio::test]
async fn end_to_end_event_scenario() {
    let fx = Fixture::new();
    fx.write("events_2025-01-01.csv", EVENTS_WITH_DUPLICATE);

    let report = fx.run().await;
    assert_eq!(
        status_of(&report, "events_2025-01-01.csv"),
        &FileStatus::Ingested { inserted: 1, duplicates: 1 }
    );
    assert_eq!(fx.store.events().len(), 1);
    assert_eq!(fx.store.machines().len(), 1);
    assert_eq!(fx.store.machines()[0].name, "M-100");
    assert!(fx.marker_exists("events_2025-01-01.csv"));

    // Second run over the unchanged directory inserts nothing.
    let report = fx.run().await;
    assert_eq!(status_of(&report, "events_2025-01-01.csv"), &FileStatus::Skipped);
    assert_eq!(report.inserted(), 0);
    assert_eq!(fx.store.events().len(), 1);
    assert_eq!(fx.store.machines().len(), 1);
}

#[tokio::test]
async fn unchanged_directory_is_idempotent_across_kinds() {
    let fx = Fixture::new();
    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-1,INFO,2025-01-01T08:00:00Z,,\n",
    );
    fx.write(
        "telemetry_2025-01-01.json",
        r#"[{"MachineName": "M-1", "Ts": "2025-01-01T08:00:00Z", "Temperature": 71.5}]"#,
    );

    let first = fx.run().await;
    assert_eq!(first.inserted(), 2);

    let second = fx.run().await;
    assert_eq!(second.inserted(), 0);
    assert_eq!(second.skipped_files(), 2);
    assert_eq!(fx.store.events().len(), 1);
    assert_eq!(fx.store.telemetry().len(), 1);
}

#[tokio::test]
async fn single_byte_change_forces_full_reingest() {
    let fx = Fixture::new();
    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-1,INFO,2025-01-01T08:00:00Z,A,\nM-1,INFO,2025-01-01T09:00:00Z,B,\n",
    );
    fx.run().await;
    assert_eq!(fx.store.events().len(), 2);

    // One byte differs; the whole file is treated as unseen and re-ingested.
    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-1,INFO,2025-01-01T08:00:00Z,A,\nM-1,INFO,2025-01-01T09:00:00Z,C,\n",
    );
    let report = fx.run().await;
    assert_eq!(
        status_of(&report, "events_2025-01-01.csv"),
        &FileStatus::Ingested { inserted: 2, duplicates: 0 }
    );
    assert_eq!(fx.store.events().len(), 4);
}

#[tokio::test]
async fn same_record_in_two_files_is_inserted_twice() {
    // Dedup is scoped to one file's pass; cross-file repeats are kept.
    let fx = Fixture::new();
    let row = "MachineName,Type,Ts,Code,Message\nM-1,FAULT,2025-01-01T08:00:00Z,E42,\n";
    fx.write("events_2025-01-01.csv", row);
    fx.write("events_2025-01-02.csv", row);

    fx.run().await;
    assert_eq!(fx.store.events().len(), 2);
}

#[tokio::test]
async fn machine_created_once_and_id_reused() {
    let fx = Fixture::new();
    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-7,INFO,2025-01-01T08:00:00Z,,\n",
    );
    fx.write(
        "telemetry_2025-01-01.json",
        r#"[{"MachineName": "M-7", "Ts": "2025-01-01T09:00:00Z", "Throughput": 42.0}]"#,
    );
    fx.run().await;

    // A later run referencing the same name reuses the id.
    fx.write(
        "events_2025-01-02.csv",
        "MachineName,Type,Ts,Code,Message\nM-7,INFO,2025-01-02T08:00:00Z,,\n",
    );
    fx.run().await;

    let machines = fx.store.machines();
    assert_eq!(machines.len(), 1);
    let id = machines[0].id;
    assert!(fx.store.events().iter().all(|e| e.machine_id == id));
    assert!(fx.store.telemetry().iter().all(|t| t.machine_id == id));
}

#[tokio::test]
async fn malformed_timestamp_fails_only_that_file() {
    let fx = Fixture::new();
    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-1,INFO,not-a-date,,\n",
    );
    fx.write(
        "events_2025-01-02.csv",
        "MachineName,Type,Ts,Code,Message\nM-2,INFO,2025-01-02T08:00:00Z,,\n",
    );

    let report = fx.run().await;
    assert!(matches!(
        status_of(&report, "events_2025-01-01.csv"),
        FileStatus::Failed { .. }
    ));
    assert_eq!(
        status_of(&report, "events_2025-01-02.csv"),
        &FileStatus::Ingested { inserted: 1, duplicates: 0 }
    );
    assert_eq!(fx.store.events().len(), 1);

    // The failed file's marker was never committed, so the fixed file is
    // picked up on the next run.
    assert!(!fx.marker_exists("events_2025-01-01.csv"));
    assert!(fx.marker_exists("events_2025-01-02.csv"));

    fx.write(
        "events_2025-01-01.csv",
        "MachineName,Type,Ts,Code,Message\nM-1,INFO,2025-01-01T08:00:00Z,,\n",
    );
    let report = fx.run().await;
    assert_eq!(
        status_of(&report, "events_2025-01-01.csv"),
        &FileStatus::Ingested { inserted: 1, duplicates: 0 }
    );
    assert_eq!(fx.store.events().len(), 2);
}

#[tokio::test]
async fn missing_data_dir_is_fatal() {
    let state = tempfile::tempdir().unwrap();
    let pipeline = IngestPipeline::new(
        IngestConfig {
            data_dir: state.path().join("no-such-dir"),
            state_dir: state.path().to_path_buf(),
        },
        MemoryStore::new(),
    )
    .unwrap();

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, FdpError::Config(_)));
}

#[tokio::test]
async fn telemetry_absent_readings_stay_null() {
    let fx = Fixture::new();
    fx.write(
        "telemetry_2025-01-01.json",
        r#"[
            {"MachineName": "M-1", "Ts": "2025-01-01T08:00:00Z", "Temperature": 70.0},
            {"MachineName": "M-1", "Ts": "2025-01-01T08:00:00Z", "Temperature": 70.0},
            {"MachineName": "M-1", "Ts": "2025-01-01T08:01:00Z", "Vibration": null}
        ]"#,
    );

    let report = fx.run().await;
    assert_eq!(
        status_of(&report, "telemetry_2025-01-01.json"),
        &FileStatus::Ingested { inserted: 2, duplicates: 1 }
    );

    let samples = fx.store.telemetry();
    assert_eq!(samples[0].temperature, Some(70.0));
    assert_eq!(samples[0].vibration, None);
    assert_eq!(samples[1].temperature, None);
    assert_eq!(samples[1].vibration, None);
    assert_eq!(samples[1].throughput, None);
}

#[tokio::test]
async fn empty_files_commit_and_are_skipped_next_run() {
    let fx = Fixture::new();
    fx.write("events_2025-01-01.csv", "MachineName,Type,Ts,Code,Message\n");

    let report = fx.run().await;
    assert_eq!(
        status_of(&report, "events_2025-01-01.csv"),
        &FileStatus::Ingested { inserted: 0, duplicates: 0 }
    );
    assert!(fx.marker_exists("events_2025-01-01.csv"));

    let report = fx.run().await;
    assert_eq!(status_of(&report, "events_2025-01-01.csv"), &FileStatus::Skipped);
}
