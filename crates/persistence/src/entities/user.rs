//! Portal user entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::user::{PortalUser, TeamMemberSummary, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRoleDb {
    Admin,
    TeamLead,
    TeamMember,
    Student,
    Tablet,
}

impl From<UserRoleDb> for UserRole {
    fn from(db_role: UserRoleDb) -> Self {
        match db_role {
            UserRoleDb::Admin => UserRole::Admin,
            UserRoleDb::TeamLead => UserRole::TeamLead,
            UserRoleDb::TeamMember => UserRole::TeamMember,
            UserRoleDb::Student => UserRole::Student,
            UserRoleDb::Tablet => UserRole::Tablet,
        }
    }
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => UserRoleDb::Admin,
            UserRole::TeamLead => UserRoleDb::TeamLead,
            UserRole::TeamMember => UserRoleDb::TeamMember,
            UserRole::Student => UserRoleDb::Student,
            UserRole::Tablet => UserRoleDb::Tablet,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub company_id: Uuid,
    pub team_id: Option<Uuid>,
    pub role: UserRoleDb,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for PortalUser {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            company_id: entity.company_id,
            team_id: entity.team_id,
            role: entity.role.into(),
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

impl From<UserEntity> for TeamMemberSummary {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            display_name: entity.display_name,
            role: entity.role.into(),
        }
    }
}

/// Row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
