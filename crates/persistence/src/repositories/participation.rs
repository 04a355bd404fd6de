//! Participation repository for database operations.
//!
//! A save locks the plan, upserts every share and removes members that are
//! no longer in the map, inside one transaction, so the stored total is
//! always 100.

use domain::services::participation::ParticipationLedger;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::ParticipationEntity;
use crate::metrics::QueryTimer;

/// Repository for participation shares of monthly plans.
#[derive(Clone)]
pub struct ParticipationRepository {
    pool: PgPool,
}

impl ParticipationRepository {
    /// Creates a new ParticipationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the shares of a plan.
    ///
    /// The plan row is locked first so concurrent saves apply one after the
    /// other. Returns `None` if the plan is missing or no longer active.
    pub async fn save(
        &self,
        plan_id: Uuid,
        ledger: &ParticipationLedger,
    ) -> Result<Option<Vec<ParticipationEntity>>, sqlx::Error> {
        let timer = QueryTimer::new("save_participation");

        let mut tx = self.pool.begin().await?;

        // Month and year come from the locked row in case the plan was just edited.
        let locked: Option<(i32, i32)> = sqlx::query_as(
            "SELECT month, year FROM monthly_plans WHERE id = $1 AND is_active = true FOR UPDATE",
        )
        .bind(plan_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((month, year)) = locked else {
            return Ok(None);
        };

        write_shares(&mut tx, plan_id, month, year, ledger).await?;
        let rows = select_shares(&mut tx, plan_id).await?;
        tx.commit().await?;

        timer.record();
        Ok(Some(rows))
    }

    /// Shares of a plan in email order.
    pub async fn list_for_plan(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_participation_for_plan");
        let mut conn = self.pool.acquire().await?;
        let result = select_shares(&mut conn, plan_id).await;
        timer.record();
        result
    }
}

/// Upserts the ledger's shares and deletes rows for members not in it.
///
/// Runs on the caller's connection so it can join a wider transaction.
pub(crate) async fn write_shares(
    conn: &mut PgConnection,
    plan_id: Uuid,
    month: i32,
    year: i32,
    ledger: &ParticipationLedger,
) -> Result<(), sqlx::Error> {
    let (emails, percentages): (Vec<String>, Vec<i32>) = ledger
        .shares()
        .map(|(email, pct)| (email.to_string(), pct))
        .unzip();

    sqlx::query(
        r#"
        INSERT INTO plan_participation (plan_id, member_email, participation_percentage, month, year)
        SELECT $1, s.email, s.pct, $4, $5
        FROM UNNEST($2::text[], $3::int[]) AS s(email, pct)
        ON CONFLICT (plan_id, member_email) DO UPDATE
        SET participation_percentage = EXCLUDED.participation_percentage,
            month = EXCLUDED.month,
            year = EXCLUDED.year,
            updated_at = NOW()
        "#,
    )
    .bind(plan_id)
    .bind(&emails)
    .bind(&percentages)
    .bind(month)
    .bind(year)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM plan_participation
        WHERE plan_id = $1 AND NOT (member_email = ANY($2::text[]))
        "#,
    )
    .bind(plan_id)
    .bind(&emails)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn select_shares(
    conn: &mut PgConnection,
    plan_id: Uuid,
) -> Result<Vec<ParticipationEntity>, sqlx::Error> {
    sqlx::query_as::<_, ParticipationEntity>(
        r#"
        SELECT plan_id, member_email, participation_percentage, month, year, updated_at
        FROM plan_participation
        WHERE plan_id = $1
        ORDER BY member_email
        "#,
    )
    .bind(plan_id)
    .fetch_all(&mut *conn)
    .await
}
