//! Monthly plan, plan history and participation entities.

use chrono::{DateTime, Utc};
use domain::models::monthly_plan::{MonthlyPlan, MonthlyPlanHistory, PlanField, PlanHistoryAction};
use domain::models::participation::Participation;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for plan_history_action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "plan_history_action", rename_all = "lowercase")]
pub enum PlanHistoryActionDb {
    Updated,
    Deleted,
}

impl From<PlanHistoryActionDb> for PlanHistoryAction {
    fn from(action: PlanHistoryActionDb) -> Self {
        match action {
            PlanHistoryActionDb::Updated => PlanHistoryAction::Updated,
            PlanHistoryActionDb::Deleted => PlanHistoryAction::Deleted,
        }
    }
}

impl From<PlanHistoryAction> for PlanHistoryActionDb {
    fn from(action: PlanHistoryAction) -> Self {
        match action {
            PlanHistoryAction::Updated => PlanHistoryActionDb::Updated,
            PlanHistoryAction::Deleted => PlanHistoryActionDb::Deleted,
        }
    }
}

/// Database row mapping for the monthly_plans table.
///
/// Field schema and values live together in the `fields` JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyPlanEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub company_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub fields: Json<Vec<PlanField>>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MonthlyPlanEntity> for MonthlyPlan {
    fn from(entity: MonthlyPlanEntity) -> Self {
        Self {
            id: entity.id,
            team_id: entity.team_id,
            company_id: entity.company_id,
            month: entity.month,
            year: entity.year,
            fields: entity.fields.0,
            is_active: entity.is_active,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the monthly_plan_history table.
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyPlanHistoryEntity {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub action: PlanHistoryActionDb,
    pub old_snapshot: Option<serde_json::Value>,
    pub new_snapshot: Option<serde_json::Value>,
    pub changed_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<MonthlyPlanHistoryEntity> for MonthlyPlanHistory {
    fn from(entity: MonthlyPlanHistoryEntity) -> Self {
        Self {
            id: entity.id,
            plan_id: entity.plan_id,
            action: entity.action.into(),
            old_snapshot: entity.old_snapshot,
            new_snapshot: entity.new_snapshot,
            changed_by: entity.changed_by,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the plan_participation table.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipationEntity {
    pub plan_id: Uuid,
    pub member_email: String,
    pub participation_percentage: i32,
    pub month: i32,
    pub year: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<ParticipationEntity> for Participation {
    fn from(entity: ParticipationEntity) -> Self {
        Self {
            plan_id: entity.plan_id,
            member_email: entity.member_email,
            participation_percentage: entity.participation_percentage,
            month: entity.month,
            year: entity.year,
            updated_at: entity.updated_at,
        }
    }
}
