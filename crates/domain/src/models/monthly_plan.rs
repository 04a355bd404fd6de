//! Monthly team plan domain models.
//!
//! A monthly plan is an ordered list of typed fields. Each field carries a
//! stable `id` next to its human-editable `label`, so renaming a label
//! never detaches the stored value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Maximum number of fields on one plan.
pub const MAX_PLAN_FIELDS: usize = 50;

/// Maximum label length.
const MAX_LABEL_LENGTH: usize = 100;

/// Value of a plan field, tagged by the kind of input it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PlanFieldValue {
    /// Single-line text.
    Text(String),
    Number(f64),
    /// Multi-line text.
    TextBox(String),
}

impl PlanFieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PlanFieldValue::Text(_) => "text",
            PlanFieldValue::Number(_) => "number",
            PlanFieldValue::TextBox(_) => "text_box",
        }
    }
}

/// One field of a monthly plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanField {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub value: PlanFieldValue,
}

/// Field as submitted by a client. New fields may omit `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanFieldInput {
    pub id: Option<String>,
    pub label: String,
    #[serde(flatten)]
    pub value: PlanFieldValue,
}

/// A monthly team plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyPlan {
    pub id: Uuid,
    pub team_id: Uuid,
    pub company_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub fields: Vec<PlanField>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyPlan {
    /// Full JSON document of the plan's content, as stored in history rows.
    pub fn snapshot(&self) -> serde_json::Value {
        plan_snapshot(self.month, self.year, &self.fields)
    }
}

/// Builds the JSON document stored in history snapshots.
pub fn plan_snapshot(month: i32, year: i32, fields: &[PlanField]) -> serde_json::Value {
    serde_json::json!({
        "month": month,
        "year": year,
        "fields": fields,
    })
}

/// Validates submitted fields and assigns ids to new ones.
pub fn normalize_fields(inputs: Vec<PlanFieldInput>) -> Result<Vec<PlanField>, DomainError> {
    if inputs.len() > MAX_PLAN_FIELDS {
        return Err(DomainError::Validation(format!(
            "A plan can have at most {} fields",
            MAX_PLAN_FIELDS
        )));
    }

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(inputs.len());

    for input in inputs {
        let label = input.label.trim().to_string();
        if label.is_empty() || label.chars().count() > MAX_LABEL_LENGTH {
            return Err(DomainError::Validation(format!(
                "Field labels must be between 1 and {} characters",
                MAX_LABEL_LENGTH
            )));
        }

        if let PlanFieldValue::Number(n) = input.value {
            if !n.is_finite() {
                return Err(DomainError::Validation(format!(
                    "Field '{}' must be a finite number",
                    label
                )));
            }
        }

        let id = match input.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        if !seen.insert(id.clone()) {
            return Err(DomainError::Validation(format!(
                "Field id '{}' is used more than once",
                id
            )));
        }

        fields.push(PlanField {
            id,
            label,
            value: input.value,
        });
    }

    Ok(fields)
}

/// History action recorded for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanHistoryAction {
    Updated,
    Deleted,
}

impl fmt::Display for PlanHistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanHistoryAction::Updated => write!(f, "updated"),
            PlanHistoryAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// A stored history row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyPlanHistory {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub action: PlanHistoryAction,
    pub old_snapshot: Option<serde_json::Value>,
    pub new_snapshot: Option<serde_json::Value>,
    pub changed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a monthly plan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMonthlyPlanRequest {
    /// Required for admins; team leads always plan for their own team.
    pub team_id: Option<Uuid>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: i32,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,

    pub fields: Vec<PlanFieldInput>,

    /// Optional participation shares saved together with the plan.
    pub participation: Option<HashMap<String, i32>>,
}

/// Request payload for replacing a plan's fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMonthlyPlanRequest {
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<i32>,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: Option<i32>,

    pub fields: Vec<PlanFieldInput>,
}

/// Query parameters for listing monthly plans.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMonthlyPlansQuery {
    pub team_id: Option<Uuid>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

/// Response wrapper for plan listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMonthlyPlansResponse {
    pub data: Vec<MonthlyPlan>,
}

/// Response wrapper for history listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanHistoryResponse {
    pub plan_id: Uuid,
    pub data: Vec<MonthlyPlanHistory>,
}
