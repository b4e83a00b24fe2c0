use axum::http::StatusCode;
use serde_json::json;

use crate::tests::fixtures::{ADMIN, JDOE, MANAGER, TECH_PLUMB};
use crate::tests::helpers::{ids, TestApp};

#[tokio::test]
async fn test_sections_list_derived_technicians() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app.get("/api/sections/", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3, 4]);
    assert_eq!(body[2]["name"], "HVAC");
    assert_eq!(body[2]["technicians"], json!(["tech_hvac"]));
    assert_eq!(body[3]["technicians"], json!(["tech_elec"]));
}

#[tokio::test]
async fn test_section_writes_are_staff_only() {
    let app = TestApp::new();
    let jdoe = app.login(JDOE.0, JDOE.1).await;
    let manager = app.login(MANAGER.0, MANAGER.1).await;

    let (status, _) = app
        .post("/api/sections/", &jdoe, json!({ "name": "Painting" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/sections/", &manager, json!({ "name": "Painting", "description": "Walls" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 5);

    let (status, body) = app
        .post("/api/sections/", &manager, json!({ "name": "painting" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["name"].is_array());

    let (status, body) = app
        .patch("/api/sections/5/", &manager, json!({ "description": "Walls and ceilings" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Painting");
    assert_eq!(body["description"], "Walls and ceilings");

    assert_eq!(app.delete("/api/sections/1/", &manager).await, StatusCode::CONFLICT);
    assert_eq!(app.delete("/api/sections/5/", &manager).await, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/api/sections/5/", &manager).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_facility_crud() {
    let app = TestApp::new();
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    let (status, body) = app.get("/api/facilities/4/", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "room");
    assert_eq!(body["status"], "under_maintenance");

    let (status, body) = app
        .post(
            "/api/facilities/",
            &admin,
            json!({ "name": "Gym", "type": "building", "status": "active" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 8);

    let (status, body) = app
        .patch("/api/facilities/8/", &admin, json!({ "status": "inactive" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["name"], "Gym");

    assert_eq!(app.delete("/api/facilities/3/", &admin).await, StatusCode::CONFLICT);
    assert_eq!(app.delete("/api/facilities/8/", &admin).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_user_directory_permissions() {
    let app = TestApp::new();
    let jdoe = app.login(JDOE.0, JDOE.1).await;
    let tech = app.login(TECH_PLUMB.0, TECH_PLUMB.1).await;
    let manager = app.login(MANAGER.0, MANAGER.1).await;

    let (status, _) = app.get("/api/users/", &jdoe).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/users/", &tech).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/users/?role=technician", &manager).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let (_, body) = app.get("/api/users/me/", &jdoe).await;
    assert_eq!(body["id"], 6);
    assert!(body.get("password").is_none());

    let (status, _) = app.get("/api/users/6/", &jdoe).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/users/7/", &jdoe).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_manages_users() {
    let app = TestApp::new();
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let manager = app.login(MANAGER.0, MANAGER.1).await;

    let new_tech = json!({
        "username": "tech_paint",
        "password": "brushes123",
        "email": "paint@maintdesk.local",
        "role": "technician",
        "sections": [4]
    });
    let (status, _) = app.post("/api/users/", &manager, new_tech.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/users/", &admin, new_tech).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 9);

    let token = app.login("tech_paint", "brushes123").await;
    assert_eq!(token.len(), 40);

    let (status, body) = app
        .patch("/api/users/9/", &admin, json!({ "sections": [1, 4] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sections"], json!([1, 4]));

    assert_eq!(app.delete("/api/users/6/", &admin).await, StatusCode::CONFLICT);
    assert_eq!(app.delete("/api/users/9/", &admin).await, StatusCode::NO_CONTENT);
}
