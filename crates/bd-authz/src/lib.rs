//! # bd-authz
//!
//! Role-based mutation gating for the BackDesk core.
//!
//! The guard answers one question: may this principal perform this
//! mutation on this entity kind? It is deliberately stateless — the
//! principal is read from the session collaborator at the moment of each
//! submit (see [`PrincipalSource`]), so a role change mid-session takes
//! effect on the very next action.
//!
//! ## Key components
//!
//! - [`AuthzGuard`] — the allow/deny chokepoint
//! - [`AuthzDecision`] — the evaluation result, with a reason on deny
//! - [`MutationOp`] — create / update / delete
//! - [`PrincipalSource`] — the identity/session collaborator boundary

pub mod guard;
pub mod source;

pub use guard::{AuthzDecision, AuthzGuard, MutationOp};
pub use source::{PrincipalSource, SharedSession};
