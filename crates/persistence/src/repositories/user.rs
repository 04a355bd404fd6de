//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamEntity, UserEntity};
use crate::metrics::QueryTimer;

/// Repository for user and team lookups.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID, active or not.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, company_id, team_id, role, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Active members of a team, ordered by display name.
    pub async fn list_team_members(&self, team_id: Uuid) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_team_members");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, company_id, team_id, role, is_active, created_at
            FROM users
            WHERE team_id = $1 AND is_active = true
            ORDER BY display_name, email
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Emails of active team members, lowercased.
    pub async fn team_roster_emails(&self, team_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("team_roster_emails");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT LOWER(email)
            FROM users
            WHERE team_id = $1 AND is_active = true
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by ID.
    pub async fn find_team(&self, team_id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, company_id, name, created_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
