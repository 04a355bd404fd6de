//! Visitor repository for database operations.

use chrono::NaiveDate;
use domain::models::visitor::{Admission, Discharge};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{VisitorEntity, VisitorStatusDb};
use crate::metrics::QueryTimer;

const VISITOR_COLUMNS: &str = r#"
    id, company_id, name, nic, pass_id, status, invited_by, visit_date,
    admit_time, discharged_time, discharge_reason, comments, created_at
"#;

/// Repository for visitor invitations.
#[derive(Clone)]
pub struct VisitorRepository {
    pool: PgPool,
}

impl VisitorRepository {
    /// Creates a new VisitorRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an invitation in `invited` status.
    pub async fn create(
        &self,
        company_id: Uuid,
        name: &str,
        nic: Option<&str>,
        visit_date: Option<NaiveDate>,
        invited_by: Uuid,
    ) -> Result<VisitorEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_visitor");
        let sql = format!(
            r#"
            INSERT INTO visitors (company_id, name, nic, visit_date, invited_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            VISITOR_COLUMNS
        );
        let result = sqlx::query_as::<_, VisitorEntity>(&sql)
            .bind(company_id)
            .bind(name)
            .bind(nic)
            .bind(visit_date)
            .bind(invited_by)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a visitor by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VisitorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_visitor_by_id");
        let sql = format!("SELECT {} FROM visitors WHERE id = $1", VISITOR_COLUMNS);
        let result = sqlx::query_as::<_, VisitorEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List visitors of a company, newest first.
    pub async fn list(
        &self,
        company_id: Uuid,
        status: Option<VisitorStatusDb>,
    ) -> Result<Vec<VisitorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visitors");
        let sql = format!(
            r#"
            SELECT {}
            FROM visitors
            WHERE company_id = $1 AND ($2::visitor_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            VISITOR_COLUMNS
        );
        let result = sqlx::query_as::<_, VisitorEntity>(&sql)
            .bind(company_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Admit an invited visitor. Returns `None` if it was not `invited`.
    pub async fn admit(
        &self,
        id: Uuid,
        admission: &Admission,
    ) -> Result<Option<VisitorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("admit_visitor");
        let sql = format!(
            r#"
            UPDATE visitors
            SET status = 'admitted', pass_id = $2, nic = $3, admit_time = NOW()
            WHERE id = $1 AND status = 'invited'
            RETURNING {}
            "#,
            VISITOR_COLUMNS
        );
        let result = sqlx::query_as::<_, VisitorEntity>(&sql)
            .bind(id)
            .bind(&admission.pass_id)
            .bind(&admission.nic)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Discharge an admitted visitor. Returns `None` if it was not `admitted`.
    pub async fn discharge(
        &self,
        id: Uuid,
        discharge: &Discharge,
    ) -> Result<Option<VisitorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("discharge_visitor");
        let sql = format!(
            r#"
            UPDATE visitors
            SET status = 'discharged', discharge_reason = $2, comments = $3,
                discharged_time = NOW()
            WHERE id = $1 AND status = 'admitted'
            RETURNING {}
            "#,
            VISITOR_COLUMNS
        );
        let result = sqlx::query_as::<_, VisitorEntity>(&sql)
            .bind(id)
            .bind(&discharge.discharge_reason)
            .bind(&discharge.comments)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }
}
