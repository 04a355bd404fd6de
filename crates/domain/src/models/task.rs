//! Plan and task domain models.
//!
//! Member plans, assigned member tasks and personal tasks share one record
//! shape and one status lifecycle; `TaskKind` tells them apart.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Which flavour of work item a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Monthly plan entry owned by a team member.
    MemberPlan,
    /// Task a team lead assigned to a member.
    MemberTask,
    /// Personal task a member keeps for themself.
    MyTask,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::MemberPlan => "member_plan",
            TaskKind::MemberTask => "member_task",
            TaskKind::MyTask => "my_task",
        }
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member_plan" => Ok(TaskKind::MemberPlan),
            "member_task" => Ok(TaskKind::MemberTask),
            "my_task" => Ok(TaskKind::MyTask),
            _ => Err(format!("Invalid task kind: {}", s)),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status. Ordering follows the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A plan or task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: Uuid,
    pub kind: TaskKind,
    pub company_id: Uuid,
    pub team_id: Option<Uuid>,
    pub member_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub budget_revenue: Option<f64>,
    pub status: TaskStatus,
    pub assigned_by: Option<Uuid>,
    pub is_editable: bool,
    pub complete_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a plan or task.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTaskRequest {
    pub kind: TaskKind,

    /// Owner of the record. Defaults to the caller.
    pub member_id: Option<Uuid>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,

    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "Budget revenue must be non-negative"))]
    pub budget_revenue: Option<f64>,

    /// Whether the owner may edit fields. Only honoured for records a lead assigns.
    pub is_editable: Option<bool>,
}

/// Request payload for editing task fields.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTaskRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "Budget revenue must be non-negative"))]
    pub budget_revenue: Option<f64>,

    /// Only team leads and admins may toggle this.
    pub is_editable: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.budget_revenue.is_none()
            && self.is_editable.is_none()
    }
}

/// Request payload for a non-terminal status change.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

/// Request payload for completing a task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompleteTaskRequest {
    pub complete_description: Option<String>,
}

/// Query parameters for listing tasks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTasksQuery {
    pub kind: Option<TaskKind>,
    pub member_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

/// Response wrapper for task listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTasksResponse {
    pub data: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_follows_lifecycle() {
        assert!(TaskStatus::Pending < TaskStatus::InProgress);
        assert!(TaskStatus::InProgress < TaskStatus::Completed);
        assert!(TaskStatus::Completed.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert!("In Progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_kind_parse_and_display() {
        assert_eq!("my_task".parse::<TaskKind>().unwrap(), TaskKind::MyTask);
        assert_eq!(TaskKind::MemberPlan.to_string(), "member_plan");
        assert!("plan".parse::<TaskKind>().is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let json = r#"{"kind":"member_task","month":13,"year":2024,"title":"Call clients"}"#;
        let req: CreateTaskRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());

        let json = r#"{"kind":"member_task","month":6,"year":2024,"title":"   "}"#;
        let req: CreateTaskRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_err());

        let json = r#"{"kind":"member_task","month":6,"year":2024,"title":"Call clients","budget_revenue":1500.0}"#;
        let req: CreateTaskRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_is_empty() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn test_list_query_deserialize() {
        let query: ListTasksQuery =
            serde_json::from_str(r#"{"kind":"member_plan","status":"pending","month":3}"#).unwrap();
        assert_eq!(query.kind, Some(TaskKind::MemberPlan));
        assert_eq!(query.status, Some(TaskStatus::Pending));
        assert_eq!(query.month, Some(3));
        assert!(query.year.is_none());
    }
}
