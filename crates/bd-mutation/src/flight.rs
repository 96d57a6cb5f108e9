// flight.rs — the per-(kind, operation) in-flight state machine table.
//
// This consolidates what the UI would otherwise scatter across ad-hoc
// `is_submitting` / `is_deleting` booleans: one table, keyed by
// (EntityKind, MutationOp), owned by the coordinator and queried by the
// UI. Idle is the absent-entry default; `begin` claims a slot or rejects
// the attempt, and the returned Flight releases the slot when dropped —
// on success, failure, or panic alike.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use bd_authz::MutationOp;
use bd_entity::EntityKind;

use crate::error::MutationError;

/// The phases a mutation passes through, strictly in order.
///
/// Idle is both initial and terminal. Submitting is only entered after
/// Validating and Authorizing have both passed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    #[default]
    Idle,
    Validating,
    Authorizing,
    Submitting,
    Reconciling,
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationPhase::Idle => write!(f, "idle"),
            MutationPhase::Validating => write!(f, "validating"),
            MutationPhase::Authorizing => write!(f, "authorizing"),
            MutationPhase::Submitting => write!(f, "submitting"),
            MutationPhase::Reconciling => write!(f, "reconciling"),
        }
    }
}

type FlightKey = (EntityKind, MutationOp);

/// The shared in-flight table. Cloning is cheap and all clones observe
/// the same slots.
#[derive(Clone, Default)]
pub struct FlightTable {
    slots: Arc<Mutex<HashMap<FlightKey, MutationPhase>>>,
}

impl FlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase for a (kind, operation) pair. Absent means Idle.
    pub fn phase(&self, kind: EntityKind, op: MutationOp) -> MutationPhase {
        self.lock().get(&(kind, op)).copied().unwrap_or_default()
    }

    /// Whether a new (kind, operation) mutation may start right now.
    pub fn is_idle(&self, kind: EntityKind, op: MutationOp) -> bool {
        self.phase(kind, op) == MutationPhase::Idle
    }

    /// Claim the slot for a mutation, entering Validating. Rejects the
    /// attempt while the same slot is non-Idle.
    pub(crate) fn begin(&self, kind: EntityKind, op: MutationOp) -> Result<Flight, MutationError> {
        let mut slots = self.lock();
        if slots.contains_key(&(kind, op)) {
            tracing::debug!(%kind, %op, "concurrent mutation rejected");
            return Err(MutationError::ConcurrentOperation { kind, op });
        }
        slots.insert((kind, op), MutationPhase::Validating);
        tracing::debug!(%kind, %op, phase = %MutationPhase::Validating, "mutation started");
        Ok(Flight {
            slots: Arc::clone(&self.slots),
            key: (kind, op),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<FlightKey, MutationPhase>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A claimed in-flight slot. Dropping it returns the slot to Idle —
/// the guaranteed-release half of the double-submit guard.
pub(crate) struct Flight {
    slots: Arc<Mutex<HashMap<FlightKey, MutationPhase>>>,
    key: FlightKey,
}

impl Flight {
    /// Move this mutation to its next phase.
    pub(crate) fn advance(&self, phase: MutationPhase) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(self.key, phase);
        tracing::debug!(kind = %self.key.0, op = %self.key.1, %phase, "mutation phase");
    }
}

impl Drop for Flight {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&self.key);
        tracing::debug!(kind = %self.key.0, op = %self.key.1, "mutation settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_idle() {
        let table = FlightTable::new();
        assert!(table.is_idle(EntityKind::Task, MutationOp::Create));
        assert_eq!(
            table.phase(EntityKind::Task, MutationOp::Create),
            MutationPhase::Idle
        );
    }

    #[test]
    fn begin_claims_slot_and_rejects_second_attempt() {
        let table = FlightTable::new();
        let flight = table.begin(EntityKind::Task, MutationOp::Create).unwrap();
        assert_eq!(
            table.phase(EntityKind::Task, MutationOp::Create),
            MutationPhase::Validating
        );

        let second = table.begin(EntityKind::Task, MutationOp::Create);
        assert!(matches!(
            second,
            Err(MutationError::ConcurrentOperation { .. })
        ));

        drop(flight);
        assert!(table.is_idle(EntityKind::Task, MutationOp::Create));
    }

    #[test]
    fn different_kind_op_pairs_are_independent() {
        let table = FlightTable::new();
        let _create = table.begin(EntityKind::Task, MutationOp::Create).unwrap();

        // Same kind, different op — fine.
        let _delete = table.begin(EntityKind::Task, MutationOp::Delete).unwrap();
        // Different kind, same op — fine.
        let _company = table.begin(EntityKind::Company, MutationOp::Create).unwrap();
    }

    #[test]
    fn advance_is_observable() {
        let table = FlightTable::new();
        let flight = table.begin(EntityKind::Area, MutationOp::Update).unwrap();

        flight.advance(MutationPhase::Authorizing);
        assert_eq!(
            table.phase(EntityKind::Area, MutationOp::Update),
            MutationPhase::Authorizing
        );
        flight.advance(MutationPhase::Submitting);
        assert_eq!(
            table.phase(EntityKind::Area, MutationOp::Update),
            MutationPhase::Submitting
        );
    }

    #[test]
    fn slot_released_even_on_panic() {
        let table = FlightTable::new();
        let table_clone = table.clone();

        let result = std::panic::catch_unwind(move || {
            let _flight = table_clone
                .begin(EntityKind::User, MutationOp::Delete)
                .unwrap();
            panic!("mutation blew up mid-flight");
        });
        assert!(result.is_err());

        // The Drop impl released the slot anyway.
        assert!(table.is_idle(EntityKind::User, MutationOp::Delete));
    }

    #[test]
    fn phase_display_format() {
        assert_eq!(MutationPhase::Idle.to_string(), "idle");
        assert_eq!(MutationPhase::Submitting.to_string(), "submitting");
        assert_eq!(MutationPhase::Reconciling.to_string(), "reconciling");
    }
}
