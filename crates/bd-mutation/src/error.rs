// error.rs — the mutation failure taxonomy.
//
// Validation and authorization failures resolve locally, before any
// external call. Collaborator failures pass the server's message through
// to the notification verbatim, with a generic fallback when the server
// provided none. No failure is fatal: every one returns the state
// machine to Idle.

use thiserror::Error;

use bd_authz::MutationOp;
use bd_entity::EntityKind;
use bd_store::{ServiceError, StoreError};

/// Fallback notification text for a collaborator failure that carried
/// no message of its own.
const GENERIC_COLLABORATOR_FAILURE: &str = "the request could not be completed";

/// Errors a mutation can settle with.
#[derive(Debug, Error)]
pub enum MutationError {
    /// A required task field was missing or empty. Reported to the
    /// user; no mutation attempted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A submitted reference identifier was not found in the current
    /// store snapshot — even if it exists server-side. A subtype of
    /// validation failure.
    #[error("stale reference: no {kind} with id '{id}' in the current snapshot")]
    StaleReference { kind: EntityKind, id: String },

    /// The principal's role is insufficient, or there is no
    /// authenticated session. Reported; no mutation attempted.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The same (kind, operation) machine is already non-Idle. Silently
    /// ignored at the UI action level — a no-op, not a user-facing error.
    #[error("a {kind} {op} is already in flight")]
    ConcurrentOperation { kind: EntityKind, op: MutationOp },

    /// The external persistence call rejected or timed out. The store
    /// is left unchanged and the in-flight slot is cleared.
    #[error("{0}")]
    Collaborator(String),
}

impl MutationError {
    /// Whether this failure belongs to the validation class
    /// (StaleReference is a validation subtype).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MutationError::Validation(_) | MutationError::StaleReference { .. }
        )
    }

    /// Map a persistence failure, passing its message through verbatim
    /// and falling back to a generic one when the server sent none.
    pub(crate) fn from_service(err: ServiceError) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            MutationError::Collaborator(GENERIC_COLLABORATOR_FAILURE.to_string())
        } else {
            MutationError::Collaborator(message)
        }
    }
}

impl From<StoreError> for MutationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Service(service) => MutationError::from_service(service),
            // A duplicate id in a server snapshot is the collaborator
            // handing us corrupt data, not a client-side mistake.
            other => MutationError::Collaborator(other.to_string()),
        }
    }
}
