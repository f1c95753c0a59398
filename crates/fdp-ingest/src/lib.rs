//! FDP Ingest Library
//!
//! Batch ingestion pipeline for the factory data platform. Reads externally
//! produced event files (`events_*.csv`) and telemetry files
//! (`telemetry_*.json`) from a drop directory and loads them into durable
//! storage effectively once per distinct content.
//!
//! The pipeline has no transactional log of its own; it substitutes two
//! content-addressed mechanisms:
//!
//! - a whole-file SHA-256 fingerprint, recorded in a side-channel marker
//!   store after a file's records commit, so an unchanged file is skipped on
//!   later runs;
//! - a per-record content signature, used to drop duplicate records within a
//!   single file's pass.
//!
//! Duplicate detection does not span files or runs; callers needing stronger
//! guarantees must add a durable signature index in the main store.
//!
//! # Example
//!
//! ```no_run
//! use fdp_ingest::config::IngestConfig;
//! use fdp_ingest::pipeline::IngestPipeline;
//! use fdp_ingest::store::PgStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = PgStore::connect("postgres://localhost/fdp").await?;
//!     let pipeline = IngestPipeline::new(IngestConfig::default(), store)?;
//!     let report = pipeline.run().await?;
//!     println!("inserted {} records", report.inserted());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dedupe;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod resolve;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use config::IngestConfig;
pub use pipeline::{FileStatus, IngestPipeline, RunReport};
pub use record::RawRecord;
