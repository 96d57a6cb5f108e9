// task.rs — Task: the assignment unit tying the other three kinds together.
//
// A Task references exactly one User (assignee), one Company, and one
// Area. Those three references plus the required text fields are what
// the relation validator checks before anything reaches the persistence
// collaborator. The status lifecycle only moves forward:
//
//   in_progress → completed
//
// There is no backward transition — re-opening a completed task would be
// an explicit action, never a silent field overwrite on an edit form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::{contains_ignore_case, Entity, EntityKind};

/// The task lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The default for every newly created task.
    #[default]
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

impl TaskStatus {
    /// Check whether moving from this status to `next` is a valid
    /// forward transition. Staying put is always fine.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match (self, next) {
            (TaskStatus::InProgress, _) => true,
            (TaskStatus::Completed, TaskStatus::Completed) => true,
            (TaskStatus::Completed, TaskStatus::InProgress) => false,
        }
    }
}

/// A persisted task assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: String,
    pub title: String,
    /// Free-text description of the work.
    pub observation: String,
    /// User reference — the single assignee.
    pub assigned_to: String,
    /// Company reference.
    pub company_id: String,
    /// Area reference.
    pub area_id: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Set exactly once at creation, by the creating client, before
    /// submission. Never re-derived afterwards.
    pub created_at: DateTime<Utc>,
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.title, query) || contains_ignore_case(&self.observation, query)
    }
}

/// The raw task form payload, before validation and normalization.
///
/// Edit forms carry the complete field set (full-record replace, not a
/// partial patch), so the same draft type serves both the create path
/// (`id` absent) and the edit path (`id` present).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Present on the edit path, absent on the create path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub observation: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub area_id: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Populated by the create path exactly once; carried through
    /// unchanged on the edit path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// A draft pre-filled from an existing task, for the edit form.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            title: task.title.clone(),
            observation: task.observation.clone(),
            assigned_to: task.assigned_to.clone(),
            company_id: task.company_id.clone(),
            area_id: task.area_id.clone(),
            due_date: Some(task.due_date),
            status: task.status,
            created_at: Some(task.created_at),
        }
    }

    /// Whether this draft targets an existing record.
    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
