//! Plan and task endpoint handlers.
//!
//! Member plans, assigned member tasks and personal tasks share these
//! routes; the record's `kind` decides who may create and edit it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::task::{
    CompleteTaskRequest, CreateTaskRequest, ListTasksQuery, ListTasksResponse, Task, TaskKind,
    UpdateTaskRequest, UpdateTaskStatusRequest,
};
use domain::models::{PortalUser, UserRole};
use domain::services::lifecycle::{check_field_update, plan_transition, task_access, TaskAccess};
use domain::DomainError;
use persistence::repositories::{
    NewTask, TaskFieldChanges, TaskFilter, TaskRepository, TaskScope, UserRepository,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_task_transition;
use crate::services::authorization::{require_role, require_same_company};

/// Who owns a new task and how it was assigned.
struct Assignment {
    member_id: Uuid,
    team_id: Option<Uuid>,
    assigned_by: Option<Uuid>,
    is_editable: bool,
}

/// Decides ownership for a new task.
///
/// Members create records for themselves. Team leads and admins may assign
/// plans and tasks to members of a team they manage; personal tasks are
/// never assigned.
async fn resolve_assignment(
    users: &UserRepository,
    user: &PortalUser,
    request: &CreateTaskRequest,
) -> Result<Assignment, ApiError> {
    let member_id = request.member_id.unwrap_or(user.id);

    if member_id == user.id {
        require_role(user, user.role.works_on_tasks(), "keep plans or tasks")?;
        return Ok(Assignment {
            member_id,
            team_id: user.team_id,
            assigned_by: None,
            is_editable: true,
        });
    }

    if request.kind == TaskKind::MyTask {
        return Err(ApiError::Forbidden(
            "Personal tasks can only be created for yourself".to_string(),
        ));
    }

    let member = users
        .find_by_id(member_id)
        .await?
        .filter(|m| m.is_active && m.company_id == user.company_id)
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    let team_id = member
        .team_id
        .ok_or_else(|| ApiError::Validation("Member does not belong to a team".to_string()))?;

    if !user.can_manage_team(team_id) {
        return Err(ApiError::Forbidden(
            "Only the member's team lead or an admin can assign work".to_string(),
        ));
    }

    Ok(Assignment {
        member_id,
        team_id: Some(team_id),
        assigned_by: Some(user.id),
        is_editable: request.is_editable.unwrap_or(true),
    })
}

fn scope_for(user: &PortalUser) -> TaskScope {
    match (user.role, user.team_id) {
        (UserRole::Admin, _) => TaskScope::Company {
            company_id: user.company_id,
        },
        (UserRole::TeamLead, Some(team_id)) => TaskScope::Team {
            company_id: user.company_id,
            team_id,
            user_id: user.id,
        },
        _ => TaskScope::Own {
            company_id: user.company_id,
            user_id: user.id,
        },
    }
}

/// Loads a task the caller can see, with the caller's access level.
async fn load_visible(
    repo: &TaskRepository,
    user: &PortalUser,
    task_id: Uuid,
) -> Result<(Task, TaskAccess), ApiError> {
    let task: Task = repo
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?
        .into();

    require_same_company(user, task.company_id, "Task")?;

    match task_access(user, &task) {
        TaskAccess::None => Err(ApiError::NotFound("Task not found".to_string())),
        access => Ok((task, access)),
    }
}

/// Create a plan or task.
///
/// POST /api/v1/tasks
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    request.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let assignment = resolve_assignment(&users, &user, &request).await?;

    let repo = TaskRepository::new(state.pool.clone());
    let task: Task = repo
        .create(NewTask {
            kind: request.kind.into(),
            company_id: user.company_id,
            team_id: assignment.team_id,
            member_id: assignment.member_id,
            month: request.month,
            year: request.year,
            title: request.title.trim(),
            description: request.description.as_deref(),
            date: request.date,
            budget_revenue: request.budget_revenue,
            assigned_by: assignment.assigned_by,
            is_editable: assignment.is_editable,
        })
        .await?
        .into();

    info!(
        task_id = %task.id,
        kind = %task.kind,
        member_id = %task.member_id,
        user_id = %user.id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks visible to the caller.
///
/// GET /api/v1/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<ListTasksResponse>, ApiError> {
    if let Some(month) = query.month {
        if !(1..=12).contains(&month) {
            return Err(ApiError::Validation("Month must be between 1 and 12".to_string()));
        }
    }

    let filter = TaskFilter {
        kind: query.kind.map(Into::into),
        member_id: query.member_id,
        status: query.status.map(Into::into),
        month: query.month,
        year: query.year,
    };

    let data = TaskRepository::new(state.pool.clone())
        .list(scope_for(&user), &filter)
        .await?
        .into_iter()
        .map(Task::from)
        .collect();

    Ok(Json(ListTasksResponse { data }))
}

/// Fetch a task.
///
/// GET /api/v1/tasks/:task_id
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let repo = TaskRepository::new(state.pool.clone());
    let (task, _) = load_visible(&repo, &user, task_id).await?;
    Ok(Json(task))
}

/// Edit task fields. Completed tasks reject every change.
///
/// PATCH /api/v1/tasks/:task_id
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let repo = TaskRepository::new(state.pool.clone());
    let (task, access) = load_visible(&repo, &user, task_id).await?;
    check_field_update(&task, access, &request)?;

    let changes = TaskFieldChanges {
        title: request.title.as_deref().map(str::trim),
        description: request.description.as_deref(),
        date: request.date,
        budget_revenue: request.budget_revenue,
        is_editable: request.is_editable,
    };

    // The row may have been completed or locked since it was read.
    let updated: Task = repo
        .update_fields(task_id, &changes, access == TaskAccess::Manage)
        .await?
        .ok_or(DomainError::TaskLocked)?
        .into();

    info!(task_id = %task_id, user_id = %user.id, "Task updated");
    Ok(Json(updated))
}

async fn apply_transition(
    state: &AppState,
    user: &PortalUser,
    task_id: Uuid,
    next: domain::models::TaskStatus,
    complete_description: Option<&str>,
) -> Result<Task, ApiError> {
    let repo = TaskRepository::new(state.pool.clone());
    let (task, _) = load_visible(&repo, user, task_id).await?;

    let change = plan_transition(task.status, next, complete_description)?;

    let updated: Task = repo
        .transition(
            task_id,
            task.status.into(),
            change.status.into(),
            change.is_editable,
            change.complete_description.as_deref(),
        )
        .await?
        .ok_or_else(|| {
            ApiError::Conflict("Task status changed concurrently, reload and retry".to_string())
        })?
        .into();

    record_task_transition(updated.status.as_str());
    info!(
        task_id = %task_id,
        from = %task.status,
        to = %updated.status,
        user_id = %user.id,
        "Task status changed"
    );

    Ok(updated)
}

/// Move a task forward without completing it.
///
/// POST /api/v1/tasks/:task_id/status
pub async fn update_task_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = apply_transition(&state, &user, task_id, request.status, None).await?;
    Ok(Json(task))
}

/// Complete a task with its completion narrative. The task is locked afterwards.
///
/// POST /api/v1/tasks/:task_id/complete
pub async fn complete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<CompleteTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = apply_transition(
        &state,
        &user,
        task_id,
        domain::models::TaskStatus::Completed,
        request.complete_description.as_deref(),
    )
    .await?;
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole, team_id: Option<Uuid>) -> PortalUser {
        PortalUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            display_name: "Someone".to_string(),
            company_id: Uuid::new_v4(),
            team_id,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_scope_for_roles() {
        let admin = user(UserRole::Admin, None);
        assert!(matches!(scope_for(&admin), TaskScope::Company { .. }));

        let team = Uuid::new_v4();
        let lead = user(UserRole::TeamLead, Some(team));
        assert!(matches!(scope_for(&lead), TaskScope::Team { team_id, .. } if team_id == team));

        let member = user(UserRole::TeamMember, Some(team));
        assert!(matches!(scope_for(&member), TaskScope::Own { user_id, .. } if user_id == member.id));

        let lead_without_team = user(UserRole::TeamLead, None);
        assert!(matches!(scope_for(&lead_without_team), TaskScope::Own { .. }));
    }
}
