//! Integration tests for visitor invitations and the gate.
//!
//! Tests cover:
//! - POST/GET /api/v1/visitors
//! - POST /api/v1/visitors/:visitor_id/admit
//! - POST /api/v1/visitors/:visitor_id/discharge

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, create_test_pool, get_request, json_request, parse_response_body,
    seed_company, seed_user,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_visitor_gate_flow() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company = seed_company(&pool).await;
    let member = seed_user(&pool, company.id, Some(company.team_id), "team_member").await;
    let tablet = seed_user(&pool, company.id, None, "tablet").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/visitors",
            &member.token,
            json!({ "name": "Dana Guest", "nic": "901234567V", "visit_date": "2024-06-03" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let visitor = parse_response_body(response).await;
    assert_eq!(visitor["status"], "invited");
    assert_eq!(visitor["invited_by"], member.id.to_string());
    let visitor_id = visitor["id"].as_str().unwrap().to_string();

    // Members cannot operate the gate
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/admit", visitor_id),
            &member.token,
            json!({ "pass_id": "P-17" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Discharge before admission is out of order
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/discharge", visitor_id),
            &tablet.token,
            json!({ "discharge_reason": "Left", "comments": "None" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Pass id is required; the NIC falls back to the invitation
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/admit", visitor_id),
            &tablet.token,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/admit", visitor_id),
            &tablet.token,
            json!({ "pass_id": "P-17" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let admitted = parse_response_body(response).await;
    assert_eq!(admitted["status"], "admitted");
    assert_eq!(admitted["pass_id"], "P-17");
    assert_eq!(admitted["nic"], "901234567V");
    assert!(admitted["admit_time"].is_string());

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/admit", visitor_id),
            &tablet.token,
            json!({ "pass_id": "P-18" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/visitors/{}/discharge", visitor_id),
            &tablet.token,
            json!({ "discharge_reason": "Meeting over", "comments": "Returned pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let discharged = parse_response_body(response).await;
    assert_eq!(discharged["status"], "discharged");
    assert!(discharged["discharged_time"].is_string());

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/visitors?status=discharged", &tablet.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = parse_response_body(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admit_requires_nic_when_invitation_has_none() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company = seed_company(&pool).await;
    let admin = seed_user(&pool, company.id, None, "admin").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/visitors",
            &admin.token,
            json!({ "name": "Walk-in" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let visitor_id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/visitors/{}/admit", visitor_id);
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, &uri, &admin.token, json!({ "pass_id": "P-1" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &uri,
            &admin.token,
            json!({ "pass_id": "P-1", "nic": "A1234567" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_students_cannot_invite_and_visitors_stay_in_company() {
    let pool = create_test_pool().await;
    let app = create_test_app(pool.clone());
    let company = seed_company(&pool).await;
    let student = seed_user(&pool, company.id, Some(company.team_id), "student").await;
    let lead = seed_user(&pool, company.id, Some(company.team_id), "team_lead").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/visitors",
            &student.token,
            json!({ "name": "Friend" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/visitors",
            &lead.token,
            json!({ "name": "Auditor" }),
        ))
        .await
        .unwrap();
    let visitor_id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let other = seed_company(&pool).await;
    let foreign_tablet = seed_user(&pool, other.id, None, "tablet").await;
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/v1/visitors/{}", visitor_id),
            &foreign_tablet.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
