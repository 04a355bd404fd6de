//! Task repository for database operations.
//!
//! Every mutating statement carries `status <> 'completed'` so a completed
//! task stays frozen even if a caller skipped the domain checks.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TaskEntity, TaskKindDb, TaskStatusDb};
use crate::metrics::QueryTimer;

const TASK_COLUMNS: &str = r#"
    id, kind, company_id, team_id, member_id, month, year, title, description, date,
    budget_revenue, status, assigned_by, is_editable, complete_description, created_at, updated_at
"#;

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask<'a> {
    pub kind: TaskKindDb,
    pub company_id: Uuid,
    pub team_id: Option<Uuid>,
    pub member_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub budget_revenue: Option<f64>,
    pub assigned_by: Option<Uuid>,
    pub is_editable: bool,
}

/// Field changes for a task. `None` leaves a column untouched, so a PATCH
/// cannot clear `description`, `date` or `budget_revenue` once set.
#[derive(Debug, Clone, Default)]
pub struct TaskFieldChanges<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub budget_revenue: Option<f64>,
    pub is_editable: Option<bool>,
}

/// Which tasks a caller can see.
#[derive(Debug, Clone, Copy)]
pub enum TaskScope {
    /// Every task of the company.
    Company { company_id: Uuid },
    /// The caller's own tasks plus the team's plans and assigned tasks.
    Team {
        company_id: Uuid,
        team_id: Uuid,
        user_id: Uuid,
    },
    /// Only the caller's own tasks.
    Own { company_id: Uuid, user_id: Uuid },
}

impl TaskScope {
    fn params(&self) -> (Uuid, Option<Uuid>, Option<Uuid>) {
        match *self {
            TaskScope::Company { company_id } => (company_id, None, None),
            TaskScope::Team {
                company_id,
                team_id,
                user_id,
            } => (company_id, Some(user_id), Some(team_id)),
            TaskScope::Own {
                company_id,
                user_id,
            } => (company_id, Some(user_id), None),
        }
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub kind: Option<TaskKindDb>,
    pub member_id: Option<Uuid>,
    pub status: Option<TaskStatusDb>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

/// Repository for task-related database operations.
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Creates a new TaskRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new task in `pending` status.
    pub async fn create(&self, task: NewTask<'_>) -> Result<TaskEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_task");
        let sql = format!(
            r#"
            INSERT INTO tasks (kind, company_id, team_id, member_id, month, year, title,
                               description, date, budget_revenue, assigned_by, is_editable)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            TASK_COLUMNS
        );
        let result = sqlx::query_as::<_, TaskEntity>(&sql)
            .bind(task.kind)
            .bind(task.company_id)
            .bind(task.team_id)
            .bind(task.member_id)
            .bind(task.month)
            .bind(task.year)
            .bind(task.title)
            .bind(task.description)
            .bind(task.date)
            .bind(task.budget_revenue)
            .bind(task.assigned_by)
            .bind(task.is_editable)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a task by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_task_by_id");
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let result = sqlx::query_as::<_, TaskEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List tasks visible in the given scope, newest period first.
    pub async fn list(
        &self,
        scope: TaskScope,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tasks");
        let (company_id, user_id, team_id) = scope.params();
        let sql = format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE company_id = $1
              AND ($2::uuid IS NULL
                   OR member_id = $2
                   OR ($3::uuid IS NOT NULL AND team_id = $3 AND kind <> 'my_task'))
              AND ($4::task_kind IS NULL OR kind = $4)
              AND ($5::uuid IS NULL OR member_id = $5)
              AND ($6::task_status IS NULL OR status = $6)
              AND ($7::int IS NULL OR month = $7)
              AND ($8::int IS NULL OR year = $8)
            ORDER BY year DESC, month DESC, created_at DESC
            "#,
            TASK_COLUMNS
        );
        let result = sqlx::query_as::<_, TaskEntity>(&sql)
            .bind(company_id)
            .bind(user_id)
            .bind(team_id)
            .bind(filter.kind)
            .bind(filter.member_id)
            .bind(filter.status)
            .bind(filter.month)
            .bind(filter.year)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Apply field changes. Returns `None` if the task is missing or completed,
    /// or locked while `can_edit_locked` is false.
    pub async fn update_fields(
        &self,
        id: Uuid,
        changes: &TaskFieldChanges<'_>,
        can_edit_locked: bool,
    ) -> Result<Option<TaskEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_task_fields");
        let sql = format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                budget_revenue = COALESCE($5, budget_revenue),
                is_editable = COALESCE($6, is_editable),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'completed' AND (is_editable OR $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        );
        let result = sqlx::query_as::<_, TaskEntity>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.date)
            .bind(changes.budget_revenue)
            .bind(changes.is_editable)
            .bind(can_edit_locked)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Move a task from `from` to `to`.
    ///
    /// Returns `None` if the task no longer has status `from`, so two
    /// concurrent transitions cannot both succeed.
    pub async fn transition(
        &self,
        id: Uuid,
        from: TaskStatusDb,
        to: TaskStatusDb,
        is_editable: Option<bool>,
        complete_description: Option<&str>,
    ) -> Result<Option<TaskEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_task_status");
        let sql = format!(
            r#"
            UPDATE tasks
            SET status = $3,
                is_editable = COALESCE($4, is_editable),
                complete_description = COALESCE($5, complete_description),
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND status <> 'completed'
            RETURNING {}
            "#,
            TASK_COLUMNS
        );
        let result = sqlx::query_as::<_, TaskEntity>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(is_editable)
            .bind(complete_description)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }
}
