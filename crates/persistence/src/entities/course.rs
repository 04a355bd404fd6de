//! Course and course content entities.

use chrono::{DateTime, Utc};
use domain::models::course::{Course, CourseContent};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the courses table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<CourseEntity> for Course {
    fn from(entity: CourseEntity) -> Self {
        Self {
            id: entity.id,
            company_id: entity.company_id,
            title: entity.title,
            description: entity.description,
            image_url: entity.image_url,
            is_deleted: entity.is_deleted,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the course_contents table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseContentEntity {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub file_url: Option<String>,
    pub position: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CourseContentEntity> for CourseContent {
    fn from(entity: CourseContentEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            title: entity.title,
            body: entity.body,
            file_url: entity.file_url,
            position: entity.position,
            is_deleted: entity.is_deleted,
            created_at: entity.created_at,
        }
    }
}
