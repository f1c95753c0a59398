//! Postgres-backed store
//!
//! Runtime-checked sqlx queries; the embedded migrations create the
//! `machines`, `events`, and `telemetry` tables on connect. Machine-name
//! uniqueness is enforced by the `machines.name` UNIQUE constraint, which is
//! the final arbiter for concurrent creation races.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::store::{IngestStore, StoreTxn};
use fdp_common::types::{Machine, NewEvent, NewMachine, NewTelemetry};
use fdp_common::{FdpError, Result};

/// Store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| FdpError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool (e.g., one shared with other components).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngestStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTxn>> {
        let txn = self.pool.begin().await.map_err(db_err)?;
        Ok(Box::new(PgTxn { txn }))
    }
}

/// One database transaction; rolled back on drop unless committed.
pub struct PgTxn {
    txn: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTxn for PgTxn {
    async fn find_machine(&mut self, name: &str) -> Result<Option<Machine>> {
        let row: Option<(i64, String, String, String)> =
            sqlx::query_as("SELECT id, name, line, status FROM machines WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut *self.txn)
                .await
                .map_err(db_err)?;

        Ok(row.map(|(id, name, line, status)| Machine { id, name, line, status }))
    }

    async fn create_machine(&mut self, machine: &NewMachine) -> Result<Machine> {
        // ON CONFLICT DO NOTHING keeps the transaction usable when another
        // writer won the race; the missing row is surfaced as a conflict so
        // the caller can re-run the lookup.
        let row: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO machines (name, line, status) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO NOTHING RETURNING id",
        )
        .bind(&machine.name)
        .bind(&machine.line)
        .bind(&machine.status)
        .fetch_optional(&mut *self.txn)
        .await
        .map_err(db_err)?;

        match row {
            Some((id,)) => Ok(Machine {
                id,
                name: machine.name.clone(),
                line: machine.line.clone(),
                status: machine.status.clone(),
            }),
            None => Err(FdpError::Conflict(format!(
                "machine name already exists: {}",
                machine.name
            ))),
        }
    }

    async fn insert_event(&mut self, event: &NewEvent) -> Result<()> {
        sqlx::query(
            "INSERT INTO events (machine_id, ts, type, code, message) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.machine_id)
        .bind(event.ts)
        .bind(&event.event_type)
        .bind(&event.code)
        .bind(&event.message)
        .execute(&mut *self.txn)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn insert_telemetry(&mut self, sample: &NewTelemetry) -> Result<()> {
        sqlx::query(
            "INSERT INTO telemetry (machine_id, ts, temperature, vibration, throughput) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(sample.machine_id)
        .bind(sample.ts)
        .bind(sample.temperature)
        .bind(sample.vibration)
        .bind(sample.throughput)
        .execute(&mut *self.txn)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.txn.commit().await.map_err(db_err)
    }
}

/// Map sqlx errors, keeping uniqueness conflicts distinguishable.
fn db_err(e: sqlx::Error) -> FdpError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return FdpError::Conflict(db.to_string());
        }
    }
    FdpError::Database(e.to_string())
}
