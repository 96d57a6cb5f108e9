// user.rs — User: an account that tasks can be assigned to.

use serde::{Deserialize, Serialize};

use crate::kind::{contains_ignore_case, Entity, EntityKind};
use crate::principal::Role;

/// A user account. Referenced by `Task.assigned_to`.
///
/// Credentials and session issuance live entirely in the identity
/// collaborator; this record only carries what the lists and the task
/// form need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.email, query)
            || contains_ignore_case(&self.role.to_string(), query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Alice Rivers".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Standard,
        }
    }

    #[test]
    fn serialization_round_trip() {
        let user = test_user();
        let json = serde_json::to_string(&user).unwrap();
        let restored: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user, restored);
        assert!(json.contains("\"standard\""));
    }

    #[test]
    fn matches_name_email_and_role() {
        let user = test_user();
        assert!(user.matches("rivers"));
        assert!(user.matches("ALICE@"));
        assert!(user.matches("standard"));
        assert!(!user.matches("bob"));
    }
}
