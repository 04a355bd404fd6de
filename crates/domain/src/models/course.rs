//! Course and course content domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A training course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Course {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One lesson or attachment inside a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CourseContent {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub file_url: Option<String>,
    pub position: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// A course together with its live contents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub contents: Vec<CourseContent>,
}

/// Request payload for creating a course.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCourseRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_attachment_url"))]
    pub image_url: Option<String>,
}

/// Request payload for adding content to a course.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCourseContentRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub title: String,

    #[validate(length(max = 20000, message = "Body must be at most 20000 characters"))]
    pub body: Option<String>,

    #[validate(custom(function = "shared::validation::validate_attachment_url"))]
    pub file_url: Option<String>,

    /// Appended after the last content when omitted.
    #[validate(range(min = 0, message = "Position must not be negative"))]
    pub position: Option<i32>,
}

/// Response wrapper for course listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListCoursesResponse {
    pub data: Vec<Course>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_course_accepts_https_image() {
        let req = CreateCourseRequest {
            title: "Onboarding".to_string(),
            description: None,
            image_url: Some("https://cdn.example.com/onboarding.png".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_course_rejects_blob_image() {
        let req = CreateCourseRequest {
            title: "Onboarding".to_string(),
            description: None,
            image_url: Some("blob:https://portal.example.com/7f1c".to_string()),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("image_url"));
    }

    #[test]
    fn test_content_rejects_data_url() {
        let req = CreateCourseContentRequest {
            title: "Slides".to_string(),
            body: None,
            file_url: Some("data:application/pdf;base64,AAAA".to_string()),
            position: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_content_rejects_blank_title_and_negative_position() {
        let req = CreateCourseContentRequest {
            title: "  ".to_string(),
            body: Some("text".to_string()),
            file_url: None,
            position: Some(-1),
        };
        let err = req.validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("position"));
    }

    #[test]
    fn test_detail_flattens_course() {
        let course = Course {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Safety".to_string(),
            description: None,
            image_url: None,
            is_deleted: false,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(CourseDetail {
            course,
            contents: vec![],
        })
        .unwrap();
        assert_eq!(json["title"], "Safety");
        assert!(json["contents"].as_array().unwrap().is_empty());
    }
}
