//! Course endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::course::{
    Course, CourseContent, CourseDetail, CreateCourseContentRequest, CreateCourseRequest,
    ListCoursesResponse,
};
use domain::models::PortalUser;
use persistence::repositories::CourseRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::authorization::{require_admin, require_same_company};

async fn load_course(
    repo: &CourseRepository,
    user: &PortalUser,
    course_id: Uuid,
) -> Result<Course, ApiError> {
    let course: Course = repo
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?
        .into();
    require_same_company(user, course.company_id, "Course")?;
    Ok(course)
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Create a course.
///
/// POST /api/v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    require_admin(&user)?;
    request.validate()?;

    let course: Course = CourseRepository::new(state.pool.clone())
        .create(
            user.company_id,
            request.title.trim(),
            trimmed(&request.description),
            trimmed(&request.image_url),
            user.id,
        )
        .await?
        .into();

    info!(course_id = %course.id, user_id = %user.id, "Course created");
    Ok((StatusCode::CREATED, Json(course)))
}

/// List live courses of the caller's company.
///
/// GET /api/v1/courses
pub async fn list_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListCoursesResponse>, ApiError> {
    let data = CourseRepository::new(state.pool.clone())
        .list(user.company_id)
        .await?
        .into_iter()
        .map(Course::from)
        .collect();

    Ok(Json(ListCoursesResponse { data }))
}

/// Fetch a course with its contents in position order.
///
/// GET /api/v1/courses/:course_id
pub async fn get_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseDetail>, ApiError> {
    let repo = CourseRepository::new(state.pool.clone());
    let course = load_course(&repo, &user, course_id).await?;

    let contents = repo
        .contents(course_id)
        .await?
        .into_iter()
        .map(CourseContent::from)
        .collect();

    Ok(Json(CourseDetail { course, contents }))
}

/// Soft-delete a course.
///
/// DELETE /api/v1/courses/:course_id
pub async fn delete_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&user)?;

    let repo = CourseRepository::new(state.pool.clone());
    load_course(&repo, &user, course_id).await?;

    if !repo.soft_delete(course_id).await? {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    info!(course_id = %course_id, user_id = %user.id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Add a lesson or attachment to a course.
///
/// POST /api/v1/courses/:course_id/contents
pub async fn add_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(request): Json<CreateCourseContentRequest>,
) -> Result<(StatusCode, Json<CourseContent>), ApiError> {
    require_admin(&user)?;
    request.validate()?;

    let repo = CourseRepository::new(state.pool.clone());
    load_course(&repo, &user, course_id).await?;

    let content: CourseContent = repo
        .add_content(
            course_id,
            request.title.trim(),
            request.body.as_deref(),
            trimmed(&request.file_url),
            request.position,
        )
        .await?
        .into();

    info!(
        course_id = %course_id,
        content_id = %content.id,
        user_id = %user.id,
        "Course content added"
    );
    Ok((StatusCode::CREATED, Json(content)))
}

/// Soft-delete one content entry of a course.
///
/// DELETE /api/v1/courses/:course_id/contents/:content_id
pub async fn delete_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((course_id, content_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    require_admin(&user)?;

    let repo = CourseRepository::new(state.pool.clone());
    load_course(&repo, &user, course_id).await?;

    if !repo.soft_delete_content(course_id, content_id).await? {
        return Err(ApiError::NotFound("Course content not found".to_string()));
    }

    info!(course_id = %course_id, content_id = %content_id, "Course content deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_drops_blank_values() {
        assert_eq!(trimmed(&Some("  https://x.io/a.png ".into())), Some("https://x.io/a.png"));
        assert_eq!(trimmed(&Some("   ".into())), None);
        assert_eq!(trimmed(&None), None);
    }
}
