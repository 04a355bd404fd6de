//! Task lifecycle rules.
//!
//! Status only moves forward (`pending → in_progress → completed`) and
//! `completed` is terminal: a completed record refuses every further
//! change, and completing it requires a written completion description.

use crate::error::DomainError;
use crate::models::task::{Task, TaskKind, TaskStatus, UpdateTaskRequest};
use crate::models::user::PortalUser;

/// Column values to persist for an accepted status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: TaskStatus,
    pub is_editable: Option<bool>,
    pub complete_description: Option<String>,
}

/// What a user may do with a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskAccess {
    None,
    /// Owner of a locked record: may read and move its status.
    Progress,
    /// Owner of an editable record: may also change its fields.
    Edit,
    /// Team lead of the record's team or company admin.
    Manage,
}

/// Rejects any change to a completed task.
pub fn ensure_mutable(task: &Task) -> Result<(), DomainError> {
    if task.status.is_terminal() {
        Err(DomainError::TaskLocked)
    } else {
        Ok(())
    }
}

/// Validates a status change and returns what to persist.
///
/// Moving to `completed` needs a non-blank description; the trimmed text
/// is stored and the record becomes read-only.
pub fn plan_transition(
    current: TaskStatus,
    next: TaskStatus,
    complete_description: Option<&str>,
) -> Result<StatusChange, DomainError> {
    if current.is_terminal() {
        return Err(DomainError::TaskLocked);
    }

    if next <= current {
        return Err(DomainError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }

    if next == TaskStatus::Completed {
        let description = complete_description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(DomainError::CompletionDescriptionRequired)?;

        return Ok(StatusChange {
            status: next,
            is_editable: Some(false),
            complete_description: Some(description.to_string()),
        });
    }

    Ok(StatusChange {
        status: next,
        is_editable: None,
        complete_description: None,
    })
}

/// Resolves the access a user has to a task. Users of another company,
/// admins included, get nothing.
pub fn task_access(user: &PortalUser, task: &Task) -> TaskAccess {
    if task.company_id != user.company_id {
        return TaskAccess::None;
    }

    if user.is_admin() {
        return TaskAccess::Manage;
    }

    if let Some(team_id) = task.team_id {
        if user.leads_team(team_id) && task.kind != TaskKind::MyTask {
            return TaskAccess::Manage;
        }
    }

    if task.member_id == user.id {
        if task.is_editable || task.kind == TaskKind::MyTask {
            return TaskAccess::Edit;
        }
        return TaskAccess::Progress;
    }

    TaskAccess::None
}

/// Checks that a field update is allowed for the given access level.
pub fn check_field_update(
    task: &Task,
    access: TaskAccess,
    update: &UpdateTaskRequest,
) -> Result<(), DomainError> {
    ensure_mutable(task)?;

    match access {
        TaskAccess::None => Err(DomainError::Forbidden(
            "No access to this task".to_string(),
        )),
        TaskAccess::Progress => Err(DomainError::Forbidden(
            "This task has been locked by your team lead".to_string(),
        )),
        TaskAccess::Edit if update.is_editable.is_some() && task.kind != TaskKind::MyTask => {
            Err(DomainError::Forbidden(
                "Only a team lead can change whether a task is editable".to_string(),
            ))
        }
        _ => Ok(()),
    }
}
