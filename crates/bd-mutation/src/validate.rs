// validate.rs — the task relation validator.
//
// A task submission must be complete before it reaches the persistence
// collaborator: every required field non-empty, and all three entity
// references resolving in the *current* store snapshot. A reference the
// snapshot cannot resolve is rejected even if the identifier still
// exists server-side — that is the stale-reference protection against
// concurrent deletion elsewhere.
//
// The full set of missing fields is reported in one pass, the way the
// form presents it, rather than failing on the first.

use chrono::Utc;

use bd_entity::{EntityKind, Task, TaskDraft};
use bd_store::EntityStore;

use crate::error::MutationError;

/// Validate a task draft against the current store snapshot and produce
/// the normalized payload for the persistence collaborator.
///
/// On the create path `created_at` is set here, exactly once, if the
/// draft did not already carry it. On the edit path the authoritative
/// value from the cached record is preserved — never re-derived.
pub fn validate_task(draft: &TaskDraft, store: &EntityStore) -> Result<Task, MutationError> {
    let mut missing = Vec::new();
    if draft.title.trim().is_empty() {
        missing.push("title");
    }
    if draft.observation.trim().is_empty() {
        missing.push("observation");
    }
    if draft.assigned_to.trim().is_empty() {
        missing.push("assigned_to");
    }
    if draft.company_id.trim().is_empty() {
        missing.push("company_id");
    }
    if draft.area_id.trim().is_empty() {
        missing.push("area_id");
    }
    if draft.due_date.is_none() {
        missing.push("due_date");
    }
    if !missing.is_empty() {
        return Err(MutationError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    // All three references must resolve in the currently loaded lists.
    if !store.users().contains(&draft.assigned_to) {
        return Err(MutationError::StaleReference {
            kind: EntityKind::User,
            id: draft.assigned_to.clone(),
        });
    }
    if !store.companies().contains(&draft.company_id) {
        return Err(MutationError::StaleReference {
            kind: EntityKind::Company,
            id: draft.company_id.clone(),
        });
    }
    if !store.areas().contains(&draft.area_id) {
        return Err(MutationError::StaleReference {
            kind: EntityKind::Area,
            id: draft.area_id.clone(),
        });
    }

    // On an edit, the status may only move forward. Re-opening a
    // completed task is an explicit action, not an edit-form overwrite.
    let existing = draft
        .id
        .as_deref()
        .and_then(|id| store.tasks().get(id))
        .cloned();
    if let Some(ref existing) = existing {
        if !existing.status.can_transition_to(draft.status) {
            return Err(MutationError::Validation(format!(
                "status cannot move from {} back to {}",
                existing.status, draft.status
            )));
        }
    }

    let created_at = existing
        .map(|t| t.created_at)
        .or(draft.created_at)
        .unwrap_or_else(Utc::now);

    Ok(Task {
        id: draft.id.clone().unwrap_or_default(),
        title: draft.title.clone(),
        observation: draft.observation.clone(),
        assigned_to: draft.assigned_to.clone(),
        company_id: draft.company_id.clone(),
        area_id: draft.area_id.clone(),
        // Checked above: due_date is present once `missing` is empty.
        due_date: draft.due_date.unwrap_or_else(Utc::now),
        status: draft.status,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_entity::{Area, Company, CompanyType, Role, TaskStatus, User};

    fn seeded_store() -> EntityStore {
        let mut store = EntityStore::new();
        store
            .users_mut()
            .apply_create(User {
                id: "u1".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                role: Role::Standard,
            })
            .unwrap();
        store
            .companies_mut()
            .apply_create(Company {
                id: "c1".to_string(),
                name: "Acme".to_string(),
                nit: "900123456-7".to_string(),
                email: "billing@acme.co".to_string(),
                company_type: CompanyType::A,
                cellphone: None,
                dian: None,
                legal_signature: None,
                accounting_software: None,
                mail_server: None,
            })
            .unwrap();
        store
            .areas_mut()
            .apply_create(Area {
                id: "a1".to_string(),
                name: "Payroll".to_string(),
                department: "Finance".to_string(),
                description: None,
            })
            .unwrap();
        store
    }

    fn complete_draft() -> TaskDraft {
        TaskDraft {
            id: None,
            title: "Audit".to_string(),
            observation: "Q1 review".to_string(),
            assigned_to: "u1".to_string(),
            company_id: "c1".to_string(),
            area_id: "a1".to_string(),
            due_date: Some("2024-06-01T00:00:00Z".parse().unwrap()),
            status: TaskStatus::InProgress,
            created_at: None,
        }
    }

    #[test]
    fn complete_draft_normalizes() {
        let store = seeded_store();
        let task = validate_task(&complete_draft(), &store).unwrap();
        assert_eq!(task.title, "Audit");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.id.is_empty()); // server assigns on create
    }

    #[test]
    fn all_missing_fields_reported_together() {
        let store = seeded_store();
        let draft = TaskDraft {
            title: "  ".to_string(), // whitespace counts as empty
            ..TaskDraft::default()
        };
        match validate_task(&draft, &store) {
            Err(MutationError::Validation(msg)) => {
                for field in [
                    "title",
                    "observation",
                    "assigned_to",
                    "company_id",
                    "area_id",
                    "due_date",
                ] {
                    assert!(msg.contains(field), "missing '{field}' in: {msg}");
                }
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn each_single_missing_field_rejects() {
        let store = seeded_store();
        let blank_variants: Vec<TaskDraft> = vec![
            TaskDraft {
                title: String::new(),
                ..complete_draft()
            },
            TaskDraft {
                observation: String::new(),
                ..complete_draft()
            },
            TaskDraft {
                assigned_to: String::new(),
                ..complete_draft()
            },
            TaskDraft {
                company_id: String::new(),
                ..complete_draft()
            },
            TaskDraft {
                area_id: String::new(),
                ..complete_draft()
            },
            TaskDraft {
                due_date: None,
                ..complete_draft()
            },
        ];
        for draft in blank_variants {
            assert!(
                matches!(
                    validate_task(&draft, &store),
                    Err(MutationError::Validation(_))
                ),
                "draft should have been rejected: {:?}",
                draft
            );
        }
    }

    #[test]
    fn unresolved_reference_is_stale() {
        let store = seeded_store();
        let draft = TaskDraft {
            assigned_to: "u-ghost".to_string(),
            ..complete_draft()
        };
        match validate_task(&draft, &store) {
            Err(MutationError::StaleReference { kind, id }) => {
                assert_eq!(kind, EntityKind::User);
                assert_eq!(id, "u-ghost");
            }
            other => panic!("expected StaleReference, got {:?}", other),
        }

        let draft = TaskDraft {
            area_id: "a-ghost".to_string(),
            ..complete_draft()
        };
        assert!(matches!(
            validate_task(&draft, &store),
            Err(MutationError::StaleReference {
                kind: EntityKind::Area,
                ..
            })
        ));
    }

    #[test]
    fn created_at_set_once_on_create_path() {
        let store = seeded_store();
        let before = Utc::now();
        let task = validate_task(&complete_draft(), &store).unwrap();
        assert!(task.created_at >= before);

        // A draft that already carries created_at keeps it.
        let stamp = "2024-01-15T10:00:00Z".parse().unwrap();
        let draft = TaskDraft {
            created_at: Some(stamp),
            ..complete_draft()
        };
        let task = validate_task(&draft, &store).unwrap();
        assert_eq!(task.created_at, stamp);
    }

    #[test]
    fn created_at_preserved_from_store_on_edit() {
        let mut store = seeded_store();
        let original_stamp = "2024-01-15T10:00:00Z".parse().unwrap();
        store
            .tasks_mut()
            .apply_create(Task {
                id: "t1".to_string(),
                title: "Audit".to_string(),
                observation: "Q1 review".to_string(),
                assigned_to: "u1".to_string(),
                company_id: "c1".to_string(),
                area_id: "a1".to_string(),
                due_date: "2024-06-01T00:00:00Z".parse().unwrap(),
                status: TaskStatus::InProgress,
                created_at: original_stamp,
            })
            .unwrap();

        // Even if the edit form somehow carries a different stamp, the
        // cached record's value wins.
        let draft = TaskDraft {
            id: Some("t1".to_string()),
            created_at: Some("2024-03-01T00:00:00Z".parse().unwrap()),
            ..complete_draft()
        };
        let task = validate_task(&draft, &store).unwrap();
        assert_eq!(task.created_at, original_stamp);
    }

    #[test]
    fn completed_task_cannot_be_silently_reopened() {
        let mut store = seeded_store();
        store
            .tasks_mut()
            .apply_create(Task {
                id: "t1".to_string(),
                title: "Audit".to_string(),
                observation: "Q1 review".to_string(),
                assigned_to: "u1".to_string(),
                company_id: "c1".to_string(),
                area_id: "a1".to_string(),
                due_date: "2024-06-01T00:00:00Z".parse().unwrap(),
                status: TaskStatus::Completed,
                created_at: Utc::now(),
            })
            .unwrap();

        let draft = TaskDraft {
            id: Some("t1".to_string()),
            status: TaskStatus::InProgress,
            ..complete_draft()
        };
        match validate_task(&draft, &store) {
            Err(MutationError::Validation(msg)) => {
                assert!(msg.contains("completed"), "got: {msg}");
            }
            other => panic!("expected Validation, got {:?}", other),
        }

        // Forward edit is fine.
        let draft = TaskDraft {
            id: Some("t1".to_string()),
            status: TaskStatus::Completed,
            ..complete_draft()
        };
        assert!(validate_task(&draft, &store).is_ok());
    }
}
