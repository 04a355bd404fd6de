//! Visitor entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::visitor::{Visitor, VisitorStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for visitor_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "visitor_status", rename_all = "lowercase")]
pub enum VisitorStatusDb {
    Invited,
    Admitted,
    Discharged,
}

impl From<VisitorStatusDb> for VisitorStatus {
    fn from(status: VisitorStatusDb) -> Self {
        match status {
            VisitorStatusDb::Invited => VisitorStatus::Invited,
            VisitorStatusDb::Admitted => VisitorStatus::Admitted,
            VisitorStatusDb::Discharged => VisitorStatus::Discharged,
        }
    }
}

impl From<VisitorStatus> for VisitorStatusDb {
    fn from(status: VisitorStatus) -> Self {
        match status {
            VisitorStatus::Invited => VisitorStatusDb::Invited,
            VisitorStatus::Admitted => VisitorStatusDb::Admitted,
            VisitorStatus::Discharged => VisitorStatusDb::Discharged,
        }
    }
}

/// Database row mapping for the visitors table.
#[derive(Debug, Clone, FromRow)]
pub struct VisitorEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub nic: Option<String>,
    pub pass_id: Option<String>,
    pub status: VisitorStatusDb,
    pub invited_by: Uuid,
    pub visit_date: Option<NaiveDate>,
    pub admit_time: Option<DateTime<Utc>>,
    pub discharged_time: Option<DateTime<Utc>>,
    pub discharge_reason: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VisitorEntity> for Visitor {
    fn from(entity: VisitorEntity) -> Self {
        Self {
            id: entity.id,
            company_id: entity.company_id,
            name: entity.name,
            nic: entity.nic,
            pass_id: entity.pass_id,
            status: entity.status.into(),
            invited_by: entity.invited_by,
            visit_date: entity.visit_date,
            admit_time: entity.admit_time,
            discharged_time: entity.discharged_time,
            discharge_reason: entity.discharge_reason,
            comments: entity.comments,
            created_at: entity.created_at,
        }
    }
}
