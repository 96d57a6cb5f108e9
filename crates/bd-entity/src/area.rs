// area.rs — Area: an organizational area within a department.

use serde::{Deserialize, Serialize};

use crate::kind::{contains_ignore_case, Entity, EntityKind};

/// An organizational area. Referenced by `Task.area_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Area {
    /// Server-assigned identifier.
    pub id: String,
    pub name: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Area {
    const KIND: EntityKind = EntityKind::Area;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.name, query)
            || contains_ignore_case(&self.department, query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| contains_ignore_case(d, query))
    }
}
