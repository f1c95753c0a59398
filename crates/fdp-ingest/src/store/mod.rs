//! Durable storage collaborator
//!
//! The pipeline talks to storage through two traits so the orchestrator and
//! resolver do not care which engine is behind them. [`PgStore`] is the
//! production implementation; [`MemoryStore`] backs the integration tests.

use async_trait::async_trait;

use fdp_common::types::{Machine, NewEvent, NewMachine, NewTelemetry};
use fdp_common::Result;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Handle to the durable store, able to open units of work.
#[async_trait]
pub trait IngestStore: Send + Sync {
    /// Open a unit of work covering all inserts for one source file.
    async fn begin(&self) -> Result<Box<dyn StoreTxn>>;
}

/// One unit of work: every mutation is staged until [`StoreTxn::commit`];
/// dropping an uncommitted transaction discards all of it.
#[async_trait]
pub trait StoreTxn: Send {
    /// Look up a machine by exact name.
    async fn find_machine(&mut self, name: &str) -> Result<Option<Machine>>;

    /// Create a machine. Fails with [`FdpError::Conflict`] when the name is
    /// already taken, in which case the caller should re-run the lookup.
    ///
    /// [`FdpError::Conflict`]: fdp_common::FdpError::Conflict
    async fn create_machine(&mut self, machine: &NewMachine) -> Result<Machine>;

    /// Append one event fact.
    async fn insert_event(&mut self, event: &NewEvent) -> Result<()>;

    /// Append one telemetry fact.
    async fn insert_telemetry(&mut self, sample: &NewTelemetry) -> Result<()>;

    /// Make every staged mutation durable, or none of them.
    async fn commit(self: Box<Self>) -> Result<()>;
}
