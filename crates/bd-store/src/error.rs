// error.rs — Error types for the store and the persistence boundary.

use thiserror::Error;

use bd_entity::EntityKind;

/// Errors surfaced by the persistence collaborator.
///
/// The collaborator is external — these are the only failure shapes the
/// core needs to distinguish. Everything else arrives as `Rejected` with
/// whatever message the server provided.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The server rejected the call. The message is passed through to
    /// the user verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The call did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The identifier does not exist server-side (update/delete).
    #[error("no {kind} with id '{id}'")]
    NotFound { kind: EntityKind, id: String },

    /// The identifier already exists server-side (create).
    #[error("{kind} id '{id}' already exists")]
    Conflict { kind: EntityKind, id: String },
}

/// Errors raised by the entity store itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A list snapshot carried the same identifier twice. The store
    /// never publishes such a snapshot.
    #[error("duplicate {kind} identifier '{id}' in list snapshot")]
    DuplicateId { kind: EntityKind, id: String },

    /// The persistence collaborator failed; the cached list was left
    /// unmodified.
    #[error(transparent)]
    Service(#[from] ServiceError),
}
