//! Functional tests for the HTTP API.
//!
//! These tests drive the axum router directly with `tower::ServiceExt`,
//! exercising the full stack from request parsing through role checks,
//! services, and the in-memory repository.

#![cfg(feature = "http-server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

use lms_rust::db::repositories::LocalRepository;
use lms_rust::db::repository::FullRepository;
use lms_rust::http::{create_router, AppState};

fn app() -> axum::Router {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

fn request(method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder.header("x-role", role).header("x-actor", "tester");
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["database"], json!("connected"));
}

#[tokio::test]
async fn test_missing_role_header_is_rejected() {
    let response = app()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            None,
            Some(json!({"code": "RS-101", "title": "Intro to Rust"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_learner_cannot_author_courses() {
    let response = app()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            Some("learner"),
            Some(json!({"code": "RS-101", "title": "Intro to Rust"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_course_crud_over_http() {
    let app = app();

    // Create: 201 with generated id and audit stamps.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            Some("instructor"),
            Some(json!({
                "code": "RS-101",
                "title": "Intro to Rust",
                "price": "49.00"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["data"]["status"], json!("DRAFT"));
    assert_eq!(created["data"]["created_by"], json!("tester"));

    // Partial update touches only the provided field.
    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/v1/courses/{}", id),
            Some("instructor"),
            Some(json!({"title": "Rust from scratch"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["title"], json!("Rust from scratch"));
    assert_eq!(updated["data"]["code"], json!("RS-101"));
    assert_eq!(updated["data"]["price"], json!("49.00"));

    // Duplicate code: 400 with the DUPLICATE error code.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            Some("instructor"),
            Some(json!({"code": "rs-101", "title": "Shadow course"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let duplicate = body_json(response).await;
    assert_eq!(duplicate["error"]["code"], json!("DUPLICATE"));

    // Delete draft: 204, then 404 on the follow-up read.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/v1/courses/{}", id),
            Some("instructor"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/v1/courses/{}", id),
            Some("learner"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_missing_course_is_404() {
    let response = app()
        .oneshot(request("GET", "/api/v1/courses/999", Some("learner"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_status_transitions_over_http() {
    let app = app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            Some("instructor"),
            Some(json!({"code": "RS-101", "title": "Intro to Rust"})),
        ))
        .await
        .unwrap();
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Illegal jump straight to PUBLISHED.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/v1/courses/{}/status", id),
            Some("instructor"),
            Some(json!({"status": "PUBLISHED"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("ILLEGAL_STATE"));

    // Legal chain.
    for status in ["IN_REVIEW", "PUBLISHED", "ARCHIVED"] {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/api/v1/courses/{}/status", id),
                Some("instructor"),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "transition to {}", status);
    }
}

#[tokio::test]
async fn test_enrollment_and_certificate_over_http() {
    let app = app();

    // Author and publish a course.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/courses",
            Some("instructor"),
            Some(json!({"code": "RS-101", "title": "Intro to Rust"})),
        ))
        .await
        .unwrap();
    let course_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    for status in ["IN_REVIEW", "PUBLISHED"] {
        app.clone()
            .oneshot(request(
                "POST",
                &format!("/api/v1/courses/{}/status", course_id),
                Some("instructor"),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
    }

    // Enroll as learner.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/enrollments",
            Some("learner"),
            Some(json!({"course_id": course_id, "learner_id": "lena"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let enrollment_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Double enrollment is a duplicate.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/enrollments",
            Some("learner"),
            Some(json!({"course_id": course_id, "learner_id": "lena"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Complete and certify.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/v1/enrollments/{}/progress", enrollment_id),
            Some("learner"),
            Some(json!({"progress_pct": 100})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("COMPLETED"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/certificates",
            Some("instructor"),
            Some(json!({ "enrollment_id": enrollment_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let code = body_json(response).await["data"]["verification_code"]
        .as_str()
        .unwrap()
        .to_string();

    // Public verification requires no role header.
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/v1/certificates/verify/{}", code),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["learner_id"], json!("lena"));
}

#[tokio::test]
async fn test_course_list_filtering_over_http() {
    let app = app();

    for (code, title) in [("RS-101", "Intro to Rust"), ("ML-101", "Intro to ML")] {
        app.clone()
            .oneshot(request(
                "POST",
                "/api/v1/courses",
                Some("instructor"),
                Some(json!({ "code": code, "title": title })),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/v1/courses?q=rust&status=DRAFT",
            Some("learner"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["code"], json!("RS-101"));
}
