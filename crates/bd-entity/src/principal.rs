// principal.rs — the acting identity and its privilege level.
//
// The principal is read from the identity/session collaborator at the
// moment a mutation is submitted, never cached at construction, so a
// role demotion mid-session is caught on the very next submit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Privilege level of a principal.
///
/// Only `Admin` may mutate User, Company, or Area records. Task mutation
/// is open to any authenticated principal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Standard,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Standard => write!(f, "standard"),
        }
    }
}

/// The currently authenticated actor performing an action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Identifier of the authenticated user.
    pub id: String,
    /// Privilege level at the moment the principal was read.
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Standard).unwrap(),
            "\"standard\""
        );
    }

    #[test]
    fn admin_check() {
        assert!(Principal::new("u1", Role::Admin).is_admin());
        assert!(!Principal::new("u2", Role::Standard).is_admin());
    }

    #[test]
    fn principal_round_trip() {
        let p = Principal::new("u1", Role::Standard);
        let json = serde_json::to_string(&p).unwrap();
        let restored: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}
