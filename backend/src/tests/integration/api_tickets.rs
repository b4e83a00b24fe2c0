use axum::http::StatusCode;
use serde_json::json;

use crate::tests::fixtures::{ADMIN, ALICE, JDOE, MANAGER, TECH_HVAC};
use crate::tests::helpers::{ids, TestApp};

#[tokio::test]
async fn test_users_only_list_their_own_tickets() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app.get("/api/tickets/", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
    assert_eq!(ids(&body["results"]), vec![10, 7, 3, 1, 6]);
    assert!(body["next"].is_null());

    let (status, _) = app.get("/api/tickets/2/", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_technicians_list_assigned_tickets() {
    let app = TestApp::new();
    let token = app.login(TECH_HVAC.0, TECH_HVAC.1).await;

    let (_, body) = app.get("/api/tickets/?ordering=id", &token).await;
    assert_eq!(ids(&body["results"]), vec![3, 5, 9]);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let app = TestApp::new();
    let token = app.login(ADMIN.0, ADMIN.1).await;

    let (_, body) = app.get("/api/tickets/?status=open&ordering=id", &token).await;
    assert_eq!(ids(&body["results"]), vec![1, 8]);

    let (_, body) = app.get("/api/tickets/?assigned_to=5", &token).await;
    assert_eq!(body["count"], 3);

    let (_, body) = app.get("/api/tickets/?search=boiler", &token).await;
    assert_eq!(ids(&body["results"]), vec![5]);

    let (_, body) = app
        .get("/api/tickets/?ordering=id&page_size=3&page=2", &token)
        .await;
    assert_eq!(body["count"], 10);
    assert_eq!(ids(&body["results"]), vec![4, 5, 6]);
    assert_eq!(body["next"], "/api/tickets/?ordering=id&page_size=3&page=3");
    assert_eq!(body["previous"], "/api/tickets/?ordering=id&page_size=3&page=1");
}

#[tokio::test]
async fn test_create_ticket_starts_open() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app
        .post(
            "/api/tickets/",
            &token,
            json!({
                "title": "AC broken",
                "description": "The unit is blowing warm air.",
                "section_id": 3,
                "facility_id": 7
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 11);
    assert_eq!(body["ticket_no"], "TKT-00011");
    assert_eq!(body["status"], "open");
    assert_eq!(body["raised_by"], "jdoe");
    assert_eq!(body["section"], "HVAC");
    assert_eq!(body["facility"], "Conference Room A");
    assert!(body["assigned_to"].is_null());
}

#[tokio::test]
async fn test_create_ticket_validation() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app
        .post(
            "/api/tickets/",
            &token,
            json!({ "title": "", "description": "x", "section_id": 1, "facility_id": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["title"].is_array());

    let (status, body) = app
        .post(
            "/api/tickets/",
            &token,
            json!({ "title": "Door", "description": "x", "section_id": 99, "facility_id": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["section_id"].is_array());
}

#[tokio::test]
async fn test_admin_assignment_moves_open_ticket_to_assigned() {
    let app = TestApp::new();
    let token = app.login(ADMIN.0, ADMIN.1).await;

    let (status, body) = app
        .patch("/api/tickets/1/", &token, json!({ "assigned_to_id": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["assigned_to"]["id"], 5);
    assert_eq!(body["assigned_to"]["username"], "tech_hvac");

    let (status, body) = app
        .patch("/api/tickets/8/", &token, json!({ "assigned_to_id": 6 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["assigned_to_id"].is_array());
}

#[tokio::test]
async fn test_assigned_status_requires_a_technician() {
    let app = TestApp::new();
    let token = app.login(ADMIN.0, ADMIN.1).await;

    let (status, body) = app
        .patch("/api/tickets/1/", &token, json!({ "status": "assigned" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["assigned_to_id"].is_array());

    let (_, body) = app.get("/api/tickets/1/", &token).await;
    assert_eq!(body["status"], "open");
    assert!(body["assigned_to"].is_null());

    let (status, body) = app
        .patch(
            "/api/tickets/1/",
            &token,
            json!({ "status": "assigned", "assigned_to_id": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["assigned_to"]["id"], 5);
}

#[tokio::test]
async fn test_closing_ignores_assignment() {
    let app = TestApp::new();
    let token = app.login(MANAGER.0, MANAGER.1).await;

    let (status, body) = app
        .patch(
            "/api/tickets/3/",
            &token,
            json!({ "status": "closed", "assigned_to_id": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(body["assigned_to"]["id"], 5);
    assert!(body["resolved_at"].is_string());
}

#[tokio::test]
async fn test_technician_workflow() {
    let app = TestApp::new();
    let token = app.login(TECH_HVAC.0, TECH_HVAC.1).await;

    let (status, body) = app
        .patch("/api/tickets/9/", &token, json!({ "status": "in_progress" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");

    let (status, body) = app
        .patch("/api/tickets/9/", &token, json!({ "status": "pending" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["pending_reason"].is_array());

    let (status, body) = app
        .patch(
            "/api/tickets/9/",
            &token,
            json!({ "status": "pending", "pending_reason": "Replacement bearing ordered" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pending_reason"], "Replacement bearing ordered");

    let (status, body) = app
        .patch("/api/tickets/3/", &token, json!({ "status": "resolved" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resolved_at"].is_string());

    let (status, body) = app
        .patch("/api/tickets/5/", &token, json!({ "status": "closed" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["status"].is_array());

    let (status, _) = app
        .patch("/api/tickets/2/", &token, json!({ "status": "in_progress" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_raiser_edits_and_transitions() {
    let app = TestApp::new();
    let token = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app
        .patch("/api/tickets/1/", &token, json!({ "title": "Lights flicker in Room 101" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Lights flicker in Room 101");

    let (status, body) = app
        .patch("/api/tickets/3/", &token, json!({ "title": "Renamed" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["non_field_errors"].is_array());

    let (status, body) = app
        .patch("/api/tickets/3/", &token, json!({ "status": "resolved" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["status"].is_array());

    let (status, _) = app
        .patch("/api/tickets/1/", &token, json!({ "assigned_to_id": 5 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.patch("/api/tickets/1/", &token, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["non_field_errors"].is_array());

    let (status, body) = app
        .patch("/api/tickets/1/", &token, json!({ "status": "closed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
}

#[tokio::test]
async fn test_feedback_rules() {
    let app = TestApp::new();
    let alice = app.login(ALICE.0, ALICE.1).await;
    let jdoe = app.login(JDOE.0, JDOE.1).await;

    let (status, body) = app
        .post("/api/tickets/3/feedback/", &jdoe, json!({ "rating": 5 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["non_field_errors"].is_array());

    let (status, body) = app
        .post("/api/tickets/5/feedback/", &alice, json!({ "rating": 6 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["rating"].is_array());

    let (status, body) = app
        .post(
            "/api/tickets/5/feedback/",
            &alice,
            json!({ "rating": 4, "comment": "Back to normal pressure" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 4);
    assert_eq!(body["rated_by"], "alice");

    let (status, _) = app
        .post("/api/tickets/5/feedback/", &alice, json!({ "rating": 3 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app.get("/api/tickets/5/feedback/", &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = app.get("/api/tickets/5/", &alice).await;
    assert_eq!(body["feedback"]["rating"], 4);
}

#[tokio::test]
async fn test_comments() {
    let app = TestApp::new();
    let token = app.login(ALICE.0, ALICE.1).await;

    let (status, body) = app
        .post("/api/tickets/2/comments/", &token, json!({ "text": "Now leaking into the hallway." }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "alice");
    assert_eq!(body["ticket"], 2);

    let (_, body) = app.get("/api/tickets/2/comments/", &token).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, _) = app
        .post("/api/tickets/2/comments/", &token, json!({ "text": "" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.get("/api/tickets/1/comments/", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_ticket() {
    let app = TestApp::new();
    let jdoe = app.login(JDOE.0, JDOE.1).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    assert_eq!(app.delete("/api/tickets/3/", &jdoe).await, StatusCode::FORBIDDEN);
    assert_eq!(app.delete("/api/tickets/1/", &jdoe).await, StatusCode::NO_CONTENT);
    assert_eq!(app.delete("/api/tickets/3/", &admin).await, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/api/tickets/", &admin).await;
    assert_eq!(body["count"], 8);
}
