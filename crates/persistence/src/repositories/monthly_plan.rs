//! Monthly plan repository for database operations.
//!
//! Writes that touch more than one table (plan + participation, plan +
//! history) run in a single transaction.

use domain::models::monthly_plan::{MonthlyPlan, PlanField};
use domain::services::participation::ParticipationLedger;
use domain::services::plan_history::{self, HistoryDraft};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{MonthlyPlanEntity, MonthlyPlanHistoryEntity, PlanHistoryActionDb};
use crate::metrics::QueryTimer;
use crate::repositories::participation::write_shares;

const PLAN_COLUMNS: &str =
    "id, team_id, company_id, month, year, fields, is_active, created_by, created_at, updated_at";

/// Input for creating a plan.
#[derive(Debug, Clone)]
pub struct NewMonthlyPlan<'a> {
    pub team_id: Uuid,
    pub company_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub fields: &'a [PlanField],
    pub created_by: Uuid,
}

/// Repository for monthly plans and their history.
#[derive(Clone)]
pub struct MonthlyPlanRepository {
    pool: PgPool,
}

impl MonthlyPlanRepository {
    /// Creates a new MonthlyPlanRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a plan, optionally with its participation shares.
    pub async fn create(
        &self,
        plan: NewMonthlyPlan<'_>,
        participation: Option<&ParticipationLedger>,
    ) -> Result<MonthlyPlanEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_monthly_plan");

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO monthly_plans (team_id, company_id, month, year, fields, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PLAN_COLUMNS
        );
        let created = sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
            .bind(plan.team_id)
            .bind(plan.company_id)
            .bind(plan.month)
            .bind(plan.year)
            .bind(Json(plan.fields))
            .bind(plan.created_by)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(ledger) = participation {
            write_shares(&mut tx, created.id, created.month, created.year, ledger).await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Find an active plan by ID.
    pub async fn find_active(&self, id: Uuid) -> Result<Option<MonthlyPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_monthly_plan");
        let sql = format!(
            "SELECT {} FROM monthly_plans WHERE id = $1 AND is_active = true",
            PLAN_COLUMNS
        );
        let result = sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a plan by ID, including soft-deleted ones.
    pub async fn find_any(&self, id: Uuid) -> Result<Option<MonthlyPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_monthly_plan");
        let sql = format!("SELECT {} FROM monthly_plans WHERE id = $1", PLAN_COLUMNS);
        let result = sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List active plans of a company, optionally narrowed to a team and period.
    pub async fn list_active(
        &self,
        company_id: Uuid,
        team_id: Option<Uuid>,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_monthly_plans");
        let sql = format!(
            r#"
            SELECT {}
            FROM monthly_plans
            WHERE company_id = $1
              AND is_active = true
              AND ($2::uuid IS NULL OR team_id = $2)
              AND ($3::int IS NULL OR month = $3)
              AND ($4::int IS NULL OR year = $4)
            ORDER BY year DESC, month DESC, created_at DESC
            "#,
            PLAN_COLUMNS
        );
        let result = sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
            .bind(company_id)
            .bind(team_id)
            .bind(month)
            .bind(year)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Replace a plan's content and record an `updated` history row.
    ///
    /// `month`/`year` default to the stored values. Participation rows follow
    /// the plan's period. Returns `None` if the plan is missing or inactive.
    pub async fn update(
        &self,
        id: Uuid,
        month: Option<i32>,
        year: Option<i32>,
        fields: &[PlanField],
        changed_by: Uuid,
    ) -> Result<Option<MonthlyPlanEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_monthly_plan");

        let mut tx = self.pool.begin().await?;

        let Some(before) = lock_active(&mut tx, id).await? else {
            return Ok(None);
        };
        let before: MonthlyPlan = before.into();
        let month = month.unwrap_or(before.month);
        let year = year.unwrap_or(before.year);
        let draft = plan_history::update_entry(&before, month, year, fields);

        let sql = format!(
            r#"
            UPDATE monthly_plans
            SET month = $2, year = $3, fields = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PLAN_COLUMNS
        );
        let updated = sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
            .bind(id)
            .bind(month)
            .bind(year)
            .bind(Json(fields))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE plan_participation SET month = $2, year = $3 WHERE plan_id = $1")
            .bind(id)
            .bind(month)
            .bind(year)
            .execute(&mut *tx)
            .await?;

        insert_history(&mut tx, id, &draft, changed_by).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(updated))
    }

    /// Soft delete a plan and record a `deleted` history row.
    ///
    /// Returns false if the plan is missing or already inactive.
    pub async fn soft_delete(&self, id: Uuid, changed_by: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_monthly_plan");

        let mut tx = self.pool.begin().await?;

        let Some(before) = lock_active(&mut tx, id).await? else {
            return Ok(false);
        };
        let before: MonthlyPlan = before.into();
        let draft = plan_history::delete_entry(&before);

        sqlx::query("UPDATE monthly_plans SET is_active = false, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_history(&mut tx, id, &draft, changed_by).await?;

        tx.commit().await?;
        timer.record();
        Ok(true)
    }

    /// History rows of a plan, newest first.
    pub async fn history(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<MonthlyPlanHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_monthly_plan_history");
        let result = sqlx::query_as::<_, MonthlyPlanHistoryEntity>(
            r#"
            SELECT id, plan_id, action, old_snapshot, new_snapshot, changed_by, created_at
            FROM monthly_plan_history
            WHERE plan_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

async fn lock_active(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<MonthlyPlanEntity>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM monthly_plans WHERE id = $1 AND is_active = true FOR UPDATE",
        PLAN_COLUMNS
    );
    sqlx::query_as::<_, MonthlyPlanEntity>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn insert_history(
    conn: &mut PgConnection,
    plan_id: Uuid,
    draft: &HistoryDraft,
    changed_by: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO monthly_plan_history (plan_id, action, old_snapshot, new_snapshot, changed_by)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(plan_id)
    .bind(PlanHistoryActionDb::from(draft.action))
    .bind(&draft.old_snapshot)
    .bind(&draft.new_snapshot)
    .bind(changed_by)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
