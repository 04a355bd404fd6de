//! Course repository for database operations.
//!
//! Courses and contents are soft deleted; every read here skips deleted rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CourseContentEntity, CourseEntity};
use crate::metrics::QueryTimer;

/// Repository for courses and course contents.
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Creates a new CourseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a course.
    pub async fn create(
        &self,
        company_id: Uuid,
        title: &str,
        description: Option<&str>,
        image_url: Option<&str>,
        created_by: Uuid,
    ) -> Result<CourseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_course");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (company_id, title, description, image_url, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, title, description, image_url, is_deleted, created_by, created_at
            "#,
        )
        .bind(company_id)
        .bind(title)
        .bind(description)
        .bind(image_url)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a live course by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_course_by_id");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, company_id, title, description, image_url, is_deleted, created_by, created_at
            FROM courses
            WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List live courses of a company by title.
    pub async fn list(&self, company_id: Uuid) -> Result<Vec<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_courses");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, company_id, title, description, image_url, is_deleted, created_by, created_at
            FROM courses
            WHERE company_id = $1 AND is_deleted = false
            ORDER BY title
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft delete a course. Returns false if it was already deleted.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_course");
        let result = sqlx::query(
            "UPDATE courses SET is_deleted = true WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Live contents of a course by position.
    pub async fn contents(&self, course_id: Uuid) -> Result<Vec<CourseContentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_course_contents");
        let result = sqlx::query_as::<_, CourseContentEntity>(
            r#"
            SELECT id, course_id, title, body, file_url, position, is_deleted, created_at
            FROM course_contents
            WHERE course_id = $1 AND is_deleted = false
            ORDER BY position, created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add content to a course. Without a position it goes after the last one.
    pub async fn add_content(
        &self,
        course_id: Uuid,
        title: &str,
        body: Option<&str>,
        file_url: Option<&str>,
        position: Option<i32>,
    ) -> Result<CourseContentEntity, sqlx::Error> {
        let timer = QueryTimer::new("add_course_content");
        let result = sqlx::query_as::<_, CourseContentEntity>(
            r#"
            INSERT INTO course_contents (course_id, title, body, file_url, position)
            VALUES ($1, $2, $3, $4, COALESCE($5, (
                SELECT COALESCE(MAX(position) + 1, 0)
                FROM course_contents
                WHERE course_id = $1 AND is_deleted = false
            )))
            RETURNING id, course_id, title, body, file_url, position, is_deleted, created_at
            "#,
        )
        .bind(course_id)
        .bind(title)
        .bind(body)
        .bind(file_url)
        .bind(position)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Soft delete one content of a course.
    pub async fn soft_delete_content(
        &self,
        course_id: Uuid,
        content_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_course_content");
        let result = sqlx::query(
            r#"
            UPDATE course_contents
            SET is_deleted = true
            WHERE id = $1 AND course_id = $2 AND is_deleted = false
            "#,
        )
        .bind(content_id)
        .bind(course_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
