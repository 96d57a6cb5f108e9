//! # bd-mutation
//!
//! The transactional envelope around every create/update/delete in the
//! BackDesk core.
//!
//! Every mutation runs the same state machine:
//!
//! ```text
//! Idle → Validating → Authorizing → Submitting
//!      → (Success → Reconciling → Idle) | (Failure → Idle)
//! ```
//!
//! At most one machine is active per (entity kind, operation class) at a
//! time; a second identical request while one is outstanding is rejected
//! as a no-op, not queued. The in-flight slot is released on every exit
//! path — success, failure, or panic — so the UI can never stay locked.
//!
//! ## Key components
//!
//! - [`Coordinator`] — runs the state machine and reconciles the store
//! - [`FlightTable`] / [`MutationPhase`] — the queryable in-flight guards
//! - [`validate_task`] — the task relation validator
//! - [`DeleteFlow`] — the two-step delete confirmation
//! - [`NotificationBoard`] — single-slot outcome notifications
//! - [`MutationError`] — the failure taxonomy

pub mod coordinator;
pub mod error;
pub mod flight;
pub mod validate;
pub mod workflow;

pub use coordinator::{Backends, Coordinator};
pub use error::MutationError;
pub use flight::{FlightTable, MutationPhase};
pub use validate::validate_task;
pub use workflow::{DeleteFlow, Notification, NotificationBoard, NotificationKind, PendingDelete};
