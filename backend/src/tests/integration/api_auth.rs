use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::tests::fixtures::JDOE;
use crate::tests::helpers::{body_json, TestApp};

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login/",
            None,
            Some(json!({ "username": "jdoe", "password": "password123" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), 40);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(body["user"]["username"], "jdoe");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["refresh_token"].is_null());
}

#[tokio::test]
async fn test_login_with_bad_credentials() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login/",
            None,
            Some(json!({ "username": "jdoe", "password": "nope" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_login_with_blank_fields_is_a_validation_error() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login/",
            None,
            Some(json!({ "username": "", "password": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["username"].is_array());
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn test_requests_without_a_valid_token_are_rejected() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api/tickets/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication credentials were not provided.");

    let (status, body) = app.get("/api/tickets/", "0123456789abcdef").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token.");

    let request = Request::builder()
        .uri("/api/tickets/")
        .header(header::AUTHORIZATION, "Bearer abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token header.");
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, _) = app.get("/api/auth/profile/", &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::POST, "/api/auth/logout/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get("/api/auth/profile/", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_creates_a_regular_user() {
    let app = TestApp::new();
    let payload = json!({
        "username": "carol",
        "password": "s3cret-pass",
        "email": "carol@example.com",
        "first_name": "Carol"
    });
    let (status, body) = app
        .send(Method::POST, "/api/auth/register/", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["id"], 9);

    let (status, body) = app
        .send(Method::POST, "/api/auth/register/", None, Some(payload))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["username"].is_array());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register/",
            None,
            Some(json!({ "username": "dave", "password": "short", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["password"].is_array());
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_profile_update_keeps_role() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;
    let (status, body) = app
        .patch(
            "/api/auth/profile/",
            &token,
            json!({ "first_name": "Johnny", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Johnny");
    assert_eq!(body["role"], "user");
}
