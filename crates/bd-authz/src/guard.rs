// guard.rs — the authorization chokepoint.
//
// Every mutation passes through `AuthzGuard::authorize()` before any
// external call is made:
//
// 1. Is the operation against User/Company/Area? → admin only
// 2. Is it against Task? → any authenticated principal
//
// Denial never performs a partial mutation — the coordinator checks the
// decision before entering its Submitting phase, never after.

use std::fmt;

use serde::{Deserialize, Serialize};

use bd_entity::{EntityKind, Principal};

/// The three mutation classes the guard distinguishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MutationOp {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOp::Create => write!(f, "create"),
            MutationOp::Update => write!(f, "update"),
            MutationOp::Delete => write!(f, "delete"),
        }
    }
}

/// The result of an authorization check.
///
/// `#[derive(PartialEq)]` lets us use `==` to compare decisions in tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuthzDecision {
    /// The mutation is allowed — proceed.
    Allow,
    /// The mutation is denied — do not proceed.
    Deny { reason: String },
}

impl AuthzDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthzDecision::Allow)
    }
}

/// The authorization guard — evaluates mutations against the principal's
/// current role.
///
/// Stateless by design: callers pass the principal they read from the
/// session collaborator *now*, not one captured when a form was opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthzGuard;

impl AuthzGuard {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate whether `principal` may perform `op` on `kind`.
    pub fn authorize(
        &self,
        principal: &Principal,
        kind: EntityKind,
        op: MutationOp,
    ) -> AuthzDecision {
        match kind {
            // Task mutation is open to any authenticated principal — the
            // caller having a Principal at all proves authentication.
            EntityKind::Task => AuthzDecision::Allow,

            // Directory records are admin-only, for every operation class.
            EntityKind::User | EntityKind::Company | EntityKind::Area => {
                if principal.is_admin() {
                    AuthzDecision::Allow
                } else {
                    tracing::warn!(
                        principal = %principal.id,
                        role = %principal.role,
                        %kind,
                        %op,
                        "mutation denied: admin role required"
                    );
                    AuthzDecision::Deny {
                        reason: format!(
                            "role '{}' may not {} {} records",
                            principal.role, op, kind
                        ),
                    }
                }
            }
        }
    }
}
