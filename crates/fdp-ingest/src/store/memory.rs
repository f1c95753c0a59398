//! In-memory store with transactional staging
//!
//! Mirrors the production store's semantics closely enough for tests:
//! inserts are staged per transaction and only become visible on commit, ids
//! come from a shared sequence that is consumed even when a transaction is
//! rolled back, and machine-name uniqueness is enforced at both create and
//! commit time.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::store::{IngestStore, StoreTxn};
use fdp_common::types::{Machine, NewEvent, NewMachine, NewTelemetry};
use fdp_common::{FdpError, Result};

#[derive(Debug, Default)]
struct Tables {
    machines: Vec<Machine>,
    events: Vec<NewEvent>,
    telemetry: Vec<NewTelemetry>,
    next_machine_id: i64,
}

/// Shared in-process store. Cloning yields another handle to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of committed machines.
    pub fn machines(&self) -> Vec<Machine> {
        self.lock().machines.clone()
    }

    /// Snapshot of committed events.
    pub fn events(&self) -> Vec<NewEvent> {
        self.lock().events.clone()
    }

    /// Snapshot of committed telemetry.
    pub fn telemetry(&self) -> Vec<NewTelemetry> {
        self.lock().telemetry.clone()
    }

    /// Committed machine with the given name, if any.
    pub fn machine_by_name(&self, name: &str) -> Option<Machine> {
        self.lock().machines.iter().find(|m| m.name == name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IngestStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTxn>> {
        Ok(Box::new(MemoryTxn {
            store: self.clone(),
            machines: Vec::new(),
            events: Vec::new(),
            telemetry: Vec::new(),
        }))
    }
}

/// Staged unit of work over a [`MemoryStore`].
pub struct MemoryTxn {
    store: MemoryStore,
    machines: Vec<Machine>,
    events: Vec<NewEvent>,
    telemetry: Vec<NewTelemetry>,
}

#[async_trait]
impl StoreTxn for MemoryTxn {
    async fn find_machine(&mut self, name: &str) -> Result<Option<Machine>> {
        if let Some(machine) = self.machines.iter().find(|m| m.name == name) {
            return Ok(Some(machine.clone()));
        }
        Ok(self.store.machine_by_name(name))
    }

    async fn create_machine(&mut self, machine: &NewMachine) -> Result<Machine> {
        if self.machines.iter().any(|m| m.name == machine.name)
            || self.store.machine_by_name(&machine.name).is_some()
        {
            return Err(FdpError::Conflict(format!(
                "machine name already exists: {}",
                machine.name
            )));
        }

        // Ids come from the shared sequence immediately, so a rolled-back
        // transaction leaves a gap just like a database sequence would.
        let id = {
            let mut tables = self.store.lock();
            tables.next_machine_id += 1;
            tables.next_machine_id
        };

        let created = Machine {
            id,
            name: machine.name.clone(),
            line: machine.line.clone(),
            status: machine.status.clone(),
        };
        self.machines.push(created.clone());
        Ok(created)
    }

    async fn insert_event(&mut self, event: &NewEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }

    async fn insert_telemetry(&mut self, sample: &NewTelemetry) -> Result<()> {
        self.telemetry.push(sample.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut tables = self.store.lock();

        // Re-check uniqueness against anything committed since `begin`.
        for staged in &self.machines {
            if tables.machines.iter().any(|m| m.name == staged.name) {
                return Err(FdpError::Conflict(format!(
                    "machine name already exists: {}",
                    staged.name
                )));
            }
        }

        tables.machines.extend(self.machines);
        tables.events.extend(self.events);
        tables.telemetry.extend(self.telemetry);
        Ok(())
    }
}
