//! Integration tests for courses and their contents.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, delete_request, get_request, json_request,
    parse_response_body, seed_company, seed_user,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_course_contents_are_ordered_and_soft_deleted() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company = seed_company(&pool).await;
    let admin = seed_user(&pool, company.id, None, "admin").await;
    let student = seed_user(&pool, company.id, Some(company.team_id), "student").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/courses",
            &admin.token,
            json!({ "title": "Onboarding", "description": "First week essentials" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let course_id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();
    let contents_uri = format!("/api/v1/courses/{}/contents", course_id);

    let mut content_ids = Vec::new();
    for title in ["Welcome", "Tools", "Security"] {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &contents_uri,
                &admin.token,
                json!({ "title": title, "body": format!("{} lesson", title) }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        content_ids.push(
            parse_response_body(response).await["id"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    let response = app
        .clone()
        .oneshot(delete_request(
            &format!("{}/{}", contents_uri, content_ids[1]),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Students read courses
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/courses/{}", course_id), &student.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let detail = parse_response_body(response).await;
    assert_eq!(detail["title"], "Onboarding");
    let titles: Vec<&str> = detail["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Welcome", "Security"]);

    // But cannot change them
    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/v1/courses/{}", course_id), &student.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/v1/courses/{}", course_id), &admin.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/courses/{}", course_id), &admin.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/courses", &admin.token))
        .await
        .unwrap();
    assert!(parse_response_body(response).await["data"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_course_rejects_non_https_image() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company = seed_company(&pool).await;
    let admin = seed_user(&pool, company.id, None, "admin").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/courses",
            &admin.token,
            json!({ "title": "Safety", "image_url": "ftp://files.example.com/a.png" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
