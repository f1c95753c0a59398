//! FDP Ingest - factory data ingestion tool

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fdp_common::logging::{init_logging, LogConfig, LogLevel};
use fdp_ingest::config::IngestConfig;
use fdp_ingest::pipeline::IngestPipeline;
use fdp_ingest::store::PgStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fdp-ingest")]
#[command(author, version, about = "FDP factory data ingestion tool")]
struct Cli {
    /// Directory holding events_*.csv and telemetry_*.json drops
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Directory holding per-file fingerprint markers
    #[arg(short, long, env = "STATE_DIR", default_value = ".etl_state")]
    state_dir: PathBuf,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    log_config.log_file_prefix = "fdp-ingest".to_string();
    // --verbose only raises verbosity when LOG_LEVEL is not set explicitly
    if cli.verbose && std::env::var("LOG_LEVEL").is_err() {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    info!(data_dir = %cli.data_dir.display(), "Starting ingestion run");

    let store = PgStore::connect(&cli.database_url).await?;
    let pipeline = IngestPipeline::new(
        IngestConfig {
            data_dir: cli.data_dir,
            state_dir: cli.state_dir,
        },
        store,
    )?;

    let report = pipeline.run().await?;

    info!(
        ingested = report.ingested_files(),
        skipped = report.skipped_files(),
        failed = report.failed_files(),
        inserted = report.inserted(),
        duplicates = report.duplicates(),
        "Ingestion complete"
    );

    Ok(())
}
