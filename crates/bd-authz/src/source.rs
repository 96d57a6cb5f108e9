// source.rs — PrincipalSource: the identity/session collaborator boundary.
//
// Session issuance and credentials live outside this core. All the core
// consumes is "who is acting right now" — and it must ask every time,
// because the answer can change between opening a form and submitting it.

use std::sync::{Mutex, PoisonError};

use bd_entity::Principal;

/// Read access to the currently authenticated principal.
///
/// Implementations must return the *current* principal on every call —
/// a role demotion mid-session has to be visible on the next submit.
/// `None` means no authenticated session.
pub trait PrincipalSource: Send + Sync {
    fn current(&self) -> Option<Principal>;
}

/// A shared mutable session slot — the reference implementation.
///
/// Production deployments adapt their real session layer behind
/// `PrincipalSource`; this one backs the tests and lets a harness swap
/// or drop the principal between calls to exercise the per-call read.
#[derive(Debug, Default)]
pub struct SharedSession {
    current: Mutex<Option<Principal>>,
}

impl SharedSession {
    pub fn new(principal: Option<Principal>) -> Self {
        Self {
            current: Mutex::new(principal),
        }
    }

    /// Replace the session's principal (sign-in, role change).
    pub fn set(&self, principal: Principal) {
        *self.lock() = Some(principal);
    }

    /// Drop the session's principal (sign-out).
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Principal>> {
        // A poisoned lock only means a writer panicked; the slot itself
        // is still a plain Option.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PrincipalSource for SharedSession {
    fn current(&self) -> Option<Principal> {
        self.lock().clone()
    }
}
