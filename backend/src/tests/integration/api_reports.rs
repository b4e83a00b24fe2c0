use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use maintdesk_shared::{ReportFormat, ReportRequest};
use serde_json::json;
use tower::ServiceExt;

use crate::handlers::reports::render_csv;
use crate::store::Store;
use crate::tests::fixtures::{ADMIN, JDOE};
use crate::tests::helpers::{body_bytes, body_json, TestApp};

#[tokio::test]
async fn test_report_types_are_staff_only() {
    let app = TestApp::new();
    let jdoe = app.login(JDOE.0, JDOE.1).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    let (status, _) = app.get("/api/reports/types/", &jdoe).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/reports/types/", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["ticket_summary", "technician_performance", "feedback"]);
}

#[tokio::test]
async fn test_generate_csv_download() {
    let app = TestApp::new();
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    let response = app
        .request(
            Method::POST,
            "/api/reports/generate/",
            Some(&admin),
            Some(json!({ "report_type": "ticket_summary", "format": "csv" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"ticket_summary_report_"));
    assert!(disposition.ends_with(".csv\""));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    let mut lines = body.lines();
    assert!(lines.next().unwrap().starts_with("Ticket,Title,Status"));
    assert_eq!(lines.count(), 10);
}

#[tokio::test]
async fn test_generate_rejects_bad_requests() {
    let app = TestApp::new();
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    let (status, body) = app
        .post(
            "/api/reports/generate/",
            &admin,
            json!({ "report_type": "ticket_summary", "format": "pdf" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["format"].is_array());

    let (status, body) = app
        .post(
            "/api/reports/generate/",
            &admin,
            json!({ "report_type": "inventory", "format": "csv" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["report_type"].is_array());

    let (status, body) = app
        .post(
            "/api/reports/generate/",
            &admin,
            json!({
                "report_type": "feedback",
                "format": "csv",
                "start_date": "2024-05-10",
                "end_date": "2024-05-01"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["end_date"].is_array());
}

#[tokio::test]
async fn test_unreadable_report_body_uses_error_envelope() {
    let app = TestApp::new();
    let admin = app.login(ADMIN.0, ADMIN.1).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reports/generate/")
        .header(header::AUTHORIZATION, format!("Token {admin}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"report_type\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());

    let (status, body) = app
        .post("/api/reports/generate/", &admin, json!({ "report_type": "feedback" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["non_field_errors"].is_array());
}

#[test]
fn test_report_date_range_filters_rows() {
    let store = Store::load(None).unwrap();
    let request = ReportRequest {
        report_type: "feedback".to_string(),
        format: ReportFormat::Csv,
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 5),
        end_date: None,
    };
    let csv = String::from_utf8(render_csv(&store, &request).unwrap()).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("TKT-00007,jdoe,4"));
}

#[test]
fn test_technician_report_columns() {
    let store = Store::load(None).unwrap();
    let request = ReportRequest {
        report_type: "technician_performance".to_string(),
        format: ReportFormat::Csv,
        start_date: None,
        end_date: None,
    };
    let csv = String::from_utf8(render_csv(&store, &request).unwrap()).unwrap();
    assert!(csv.contains("tech_hvac,3,1,1,29.0"));
}
