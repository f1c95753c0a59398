//! Machine name resolution
//!
//! Maps a human-readable machine name to its stable id, creating the machine
//! with placeholder line/status on first sight. Runs inside the same unit of
//! work as the record inserts it supports.

use tracing::debug;

use crate::store::StoreTxn;
use fdp_common::types::NewMachine;
use fdp_common::{FdpError, Result};

/// Attempts before a name resolution race is treated as fatal for the
/// current unit of work.
const MAX_RESOLVE_ATTEMPTS: usize = 3;

/// Resolve `name` to a machine id, creating the machine if absent.
///
/// The store's uniqueness constraint on the name is the final arbiter of
/// concurrent creation; losing the race falls back to re-running the lookup,
/// a bounded number of times.
pub async fn resolve_machine_id(txn: &mut dyn StoreTxn, name: &str) -> Result<i64> {
    for attempt in 1..=MAX_RESOLVE_ATTEMPTS {
        if let Some(machine) = txn.find_machine(name).await? {
            return Ok(machine.id);
        }

        match txn.create_machine(&NewMachine::placeholder(name)).await {
            Ok(machine) => {
                debug!(machine = name, id = machine.id, "Created machine on first sight");
                return Ok(machine.id);
            },
            Err(err) if err.is_conflict() => {
                debug!(machine = name, attempt, "Lost machine creation race, retrying lookup");
            },
            Err(err) => return Err(err),
        }
    }

    Err(FdpError::Resolve(format!(
        "machine '{name}' could not be resolved after {MAX_RESOLVE_ATTEMPTS} attempts"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IngestStore, MemoryStore};
    use async_trait::async_trait;
    use fdp_common::types::{Machine, NewEvent, NewTelemetry};

    #[tokio::test]
    async fn creates_machine_on_first_sight() {
        let store = MemoryStore::new();
        let mut txn = store.begin().await.unwrap();

        let id = resolve_machine_id(txn.as_mut(), "press-01").await.unwrap();
        let again = resolve_machine_id(txn.as_mut(), "press-01").await.unwrap();
        assert_eq!(id, again);

        txn.commit().await.unwrap();
        let machines = store.machines();
        assert_eq!(machines.len(), 1);
        assert_eq!(machines[0].id, id);
        assert_eq!(machines[0].name, "press-01");
    }

    #[tokio::test]
    async fn reuses_id_across_units_of_work() {
        let store = MemoryStore::new();

        let mut txn = store.begin().await.unwrap();
        let first = resolve_machine_id(txn.as_mut(), "press-01").await.unwrap();
        txn.commit().await.unwrap();

        let mut txn = store.begin().await.unwrap();
        let second = resolve_machine_id(txn.as_mut(), "press-01").await.unwrap();
        assert_eq!(first, second);
    }

    /// Transaction double that loses the creation race a fixed number of
    /// times before the lookup finally sees the winner's row.
    struct RacyTxn {
        conflicts_left: usize,
        winner: Option<Machine>,
    }

    #[async_trait]
    impl StoreTxn for RacyTxn {
        async fn find_machine(&mut self, _name: &str) -> Result<Option<Machine>> {
            if self.conflicts_left == 0 {
                Ok(self.winner.clone())
            } else {
                Ok(None)
            }
        }

        async fn create_machine(&mut self, machine: &NewMachine) -> Result<Machine> {
            self.conflicts_left = self.conflicts_left.saturating_sub(1);
            Err(FdpError::Conflict(format!("machine name already exists: {}", machine.name)))
        }

        async fn insert_event(&mut self, _event: &NewEvent) -> Result<()> {
            Ok(())
        }

        async fn insert_telemetry(&mut self, _sample: &NewTelemetry) -> Result<()> {
            Ok(())
        }

        async fn commit(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn lost_race_retries_lookup() {
        let mut txn = RacyTxn {
            conflicts_left: 1,
            winner: Some(Machine {
                id: 7,
                name: "press-01".to_string(),
                line: "LineX".to_string(),
                status: "RUNNING".to_string(),
            }),
        };

        let id = resolve_machine_id(&mut txn, "press-01").await.unwrap();
        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn exhausted_retries_fail_loudly() {
        let mut txn = RacyTxn {
            conflicts_left: usize::MAX,
            winner: None,
        };

        let err = resolve_machine_id(&mut txn, "press-01").await.unwrap_err();
        assert!(matches!(err, FdpError::Resolve(_)));
    }
}
