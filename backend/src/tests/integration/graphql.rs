use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::graphql::{build_schema, graphql_router};
use crate::tests::helpers::{body_json, test_state};

async fn execute(query: &str) -> Value {
    let schema = build_schema(test_state());
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

#[tokio::test]
async fn test_tickets_query_filters_and_sorts_as_strings() {
    let data = execute(r#"{ tickets(status: "open") { id ticketNo raisedBy } }"#).await;
    assert_eq!(
        data["tickets"],
        json!([
            { "id": 1, "ticketNo": "TKT-00001", "raisedBy": "jdoe" },
            { "id": 8, "ticketNo": "TKT-00008", "raisedBy": "bob" }
        ])
    );

    let data = execute(r#"{ tickets(sortField: "id", sortOrder: "desc", pageSize: 3) { id } }"#).await;
    assert_eq!(data["tickets"], json!([{ "id": 9 }, { "id": 8 }, { "id": 7 }]));

    let data = execute(r#"{ tickets(technician: "tech_hvac", page: 1, pageSize: 2) { id assignedTo } }"#).await;
    assert_eq!(data["tickets"], json!([{ "id": 9, "assignedTo": "tech_hvac" }]));
}

#[tokio::test]
async fn test_reference_queries() {
    let data = execute(
        r#"{
            ticket(id: 4) { status section }
            technicians { username sections }
            facilities { name type status }
            stats { total open inProgress closed }
        }"#,
    )
    .await;

    assert_eq!(data["ticket"], json!({ "status": "pending", "section": "Carpentry" }));
    assert_eq!(data["technicians"].as_array().map(Vec::len), Some(3));
    assert_eq!(data["technicians"][0], json!({ "username": "tech_elec", "sections": [1, 4] }));
    assert_eq!(
        data["facilities"][3],
        json!({ "name": "Lab 2", "type": "room", "status": "under_maintenance" })
    );
    assert_eq!(
        data["stats"],
        json!({ "total": 10, "open": 2, "inProgress": 2, "closed": 1 })
    );
}

#[tokio::test]
async fn test_missing_ticket_is_null() {
    let data = execute("{ ticket(id: 404) { id } }").await;
    assert!(data["ticket"].is_null());
}

#[tokio::test]
async fn test_create_ticket_mutation() {
    let state = test_state();
    let schema = build_schema(state.clone());
    let response = schema
        .execute(
            r#"mutation {
                createTicket(title: "AC broken", description: "Warm air only", section: "HVAC", facility: "Conference Room A") {
                    id ticketNo status raisedBy section
                }
            }"#,
        )
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(
        data["createTicket"],
        json!({
            "id": 11,
            "ticketNo": "TKT-00011",
            "status": "open",
            "raisedBy": "jdoe",
            "section": "HVAC"
        })
    );
    // the REST side sees the same store
    assert_eq!(state.store.read().await.all_tickets().len(), 11);

    let response = schema
        .execute(
            r#"mutation { createTicket(title: "x", description: "y", section: "Gardening", facility: "Library") { id } }"#,
        )
        .await;
    assert_eq!(response.errors.len(), 1);
}

#[tokio::test]
async fn test_graphql_over_http() {
    let router = graphql_router(test_state());
    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "query": "{ sections { name technicians } }" }).to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["sections"][1], json!({ "name": "Plumbing", "technicians": ["tech_plumb"] }));

    let request = Request::builder()
        .uri("/graphql")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
