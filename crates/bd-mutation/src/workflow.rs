// workflow.rs — delete confirmation and outcome notifications.
//
// Destructive operations never fire directly. A delete request parks
// the candidate in Pending-Confirmation; only an explicit confirm hands
// it to the coordinator's delete path, and cancel discards it with no
// side effect. While a delete for that kind is in flight, confirm and
// cancel are both no-ops — the same double-submit guard the coordinator
// enforces, surfaced one step earlier.
//
// Outcomes land on a single-slot notification board: a new notification
// always replaces the one on display, and dismissal is explicit.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use bd_authz::MutationOp;
use bd_entity::EntityKind;

use crate::coordinator::Coordinator;
use crate::error::MutationError;

/// Whether a notification reports success or failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One outcome notification for the surface to display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// The single display slot for notifications.
#[derive(Debug, Default)]
pub struct NotificationBoard {
    current: Mutex<Option<Notification>>,
}

impl NotificationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing whatever is currently displayed.
    pub fn publish(&self, notification: Notification) {
        tracing::debug!(message = %notification.message, "notification published");
        *self.lock() = Some(notification);
    }

    /// The notification currently on display, if any.
    pub fn current(&self) -> Option<Notification> {
        self.lock().clone()
    }

    /// Explicit dismissal — notifications never time out on their own.
    pub fn dismiss(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Notification>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A delete candidate awaiting explicit confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: EntityKind,
    pub id: String,
    /// Display name for the confirmation prompt ("delete company Acme?").
    pub label: String,
}

/// The two-step delete protocol for one UI surface.
///
/// Interior-mutable for the same reason the coordinator is: the confirm
/// click that races an in-flight delete is exactly the event this type
/// exists to swallow.
#[derive(Debug, Default)]
pub struct DeleteFlow {
    pending: Mutex<Option<PendingDelete>>,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a delete candidate for confirmation, replacing any previous
    /// one. No-op while a delete for that kind is already in flight.
    pub fn request(&self, coordinator: &Coordinator, candidate: PendingDelete) -> bool {
        if !coordinator
            .flights()
            .is_idle(candidate.kind, MutationOp::Delete)
        {
            return false;
        }
        *self.lock() = Some(candidate);
        true
    }

    /// The candidate currently awaiting confirmation.
    pub fn pending(&self) -> Option<PendingDelete> {
        self.lock().clone()
    }

    /// Discard the candidate with no side effect. No-op while the
    /// delete is in flight.
    pub fn cancel(&self, coordinator: &Coordinator) -> bool {
        let mut pending = self.lock();
        if let Some(candidate) = pending.as_ref() {
            if !coordinator
                .flights()
                .is_idle(candidate.kind, MutationOp::Delete)
            {
                return false;
            }
        }
        *pending = None;
        true
    }

    /// Execute the parked delete through the coordinator. Returns `None`
    /// when there is nothing to confirm or a delete for that kind is
    /// already in flight (the double-click case) — a silent no-op.
    pub async fn confirm(
        &self,
        coordinator: &Coordinator,
    ) -> Option<Result<(), MutationError>> {
        let candidate = {
            let pending = self.lock();
            let candidate = pending.clone()?;
            if !coordinator
                .flights()
                .is_idle(candidate.kind, MutationOp::Delete)
            {
                return None;
            }
            candidate
        };

        let result = coordinator.delete(candidate.kind, &candidate.id).await;
        match result {
            // Lost a begin race after the idle check: leave the
            // candidate parked for the flight that won.
            Err(MutationError::ConcurrentOperation { .. }) => None,
            settled => {
                *self.lock() = None;
                Some(settled)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PendingDelete>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
