//! Task entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::task::{Task, TaskKind, TaskStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for task_kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_kind", rename_all = "snake_case")]
pub enum TaskKindDb {
    MemberPlan,
    MemberTask,
    MyTask,
}

impl From<TaskKindDb> for TaskKind {
    fn from(kind: TaskKindDb) -> Self {
        match kind {
            TaskKindDb::MemberPlan => TaskKind::MemberPlan,
            TaskKindDb::MemberTask => TaskKind::MemberTask,
            TaskKindDb::MyTask => TaskKind::MyTask,
        }
    }
}

impl From<TaskKind> for TaskKindDb {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::MemberPlan => TaskKindDb::MemberPlan,
            TaskKind::MemberTask => TaskKindDb::MemberTask,
            TaskKind::MyTask => TaskKindDb::MyTask,
        }
    }
}

/// Database enum for task_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatusDb {
    Pending,
    InProgress,
    Completed,
}

impl From<TaskStatusDb> for TaskStatus {
    fn from(status: TaskStatusDb) -> Self {
        match status {
            TaskStatusDb::Pending => TaskStatus::Pending,
            TaskStatusDb::InProgress => TaskStatus::InProgress,
            TaskStatusDb::Completed => TaskStatus::Completed,
        }
    }
}

impl From<TaskStatus> for TaskStatusDb {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => TaskStatusDb::Pending,
            TaskStatus::InProgress => TaskStatusDb::InProgress,
            TaskStatus::Completed => TaskStatusDb::Completed,
        }
    }
}

/// Database row mapping for the tasks table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskEntity {
    pub id: Uuid,
    pub kind: TaskKindDb,
    pub company_id: Uuid,
    pub team_id: Option<Uuid>,
    pub member_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub budget_revenue: Option<f64>,
    pub status: TaskStatusDb,
    pub assigned_by: Option<Uuid>,
    pub is_editable: bool,
    pub complete_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskEntity> for Task {
    fn from(entity: TaskEntity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.into(),
            company_id: entity.company_id,
            team_id: entity.team_id,
            member_id: entity.member_id,
            month: entity.month,
            year: entity.year,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            budget_revenue: entity.budget_revenue,
            status: entity.status.into(),
            assigned_by: entity.assigned_by,
            is_editable: entity.is_editable,
            complete_description: entity.complete_description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
