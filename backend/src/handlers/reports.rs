//! CSV report downloads.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use maintdesk_shared::reports::report_filename;
use maintdesk_shared::{ReportFormat, ReportRequest, ReportType, Ticket};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::{validation_error, ApiResult, AppError};
use crate::store::Store;
use crate::AppState;

const TICKET_SUMMARY: &str = "ticket_summary";
const TECHNICIAN_PERFORMANCE: &str = "technician_performance";
const FEEDBACK: &str = "feedback";

pub fn report_types() -> Vec<ReportType> {
    vec![
        ReportType {
            key: TICKET_SUMMARY.to_string(),
            name: "Ticket summary".to_string(),
            description: Some("Every ticket raised in the period with its current status".to_string()),
        },
        ReportType {
            key: TECHNICIAN_PERFORMANCE.to_string(),
            name: "Technician performance".to_string(),
            description: Some("Workload and average resolution time per technician".to_string()),
        },
        ReportType {
            key: FEEDBACK.to_string(),
            name: "User feedback".to_string(),
            description: Some("Ratings and comments left on resolved tickets".to_string()),
        },
    ]
}

pub fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/types/", get(list_report_types))
        .route("/reports/generate/", post(generate_report))
}

async fn list_report_types(current: CurrentUser) -> ApiResult<Json<Vec<ReportType>>> {
    current.require_staff()?;
    Ok(Json(report_types()))
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> ApiResult<Response> {
    current.require_staff()?;
    let Json(request) = payload?;
    if request.format != ReportFormat::Csv {
        return Err(validation_error(
            "format",
            "Only CSV reports are available from the development server.",
        ));
    }
    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if end < start {
            return Err(validation_error("end_date", "End date must not be before start date."));
        }
    }

    let body = {
        let store = state.store.read().await;
        render_csv(&store, &request)?
    };
    let filename = report_filename(&request.report_type, request.format, Utc::now().date_naive());
    tracing::info!(report = %request.report_type, bytes = body.len(), "Report generated");

    Ok((
        [
            (header::CONTENT_TYPE, request.format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

fn tickets_in_range(store: &Store, request: &ReportRequest) -> Vec<Ticket> {
    store
        .all_tickets()
        .into_iter()
        .filter(|t| in_range(t.created_at.date_naive(), request.start_date, request.end_date))
        .collect()
}

pub fn render_csv(store: &Store, request: &ReportRequest) -> ApiResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let csv_error = |e: csv::Error| AppError::InternalError(e.to_string());

    match request.report_type.as_str() {
        TICKET_SUMMARY => {
            writer
                .write_record([
                    "Ticket", "Title", "Status", "Section", "Facility", "Raised by",
                    "Assigned to", "Created", "Resolved",
                ])
                .map_err(csv_error)?;
            for t in tickets_in_range(store, request) {
                writer
                    .write_record([
                        t.ticket_no,
                        t.title,
                        t.status.label().to_string(),
                        t.section.unwrap_or_default(),
                        t.facility.unwrap_or_default(),
                        t.raised_by,
                        t.assigned_to.map(|u| u.username).unwrap_or_default(),
                        t.created_at.to_rfc3339(),
                        t.resolved_at.map(|at| at.to_rfc3339()).unwrap_or_default(),
                    ])
                    .map_err(csv_error)?;
            }
        }
        TECHNICIAN_PERFORMANCE => {
            writer
                .write_record(["Technician", "Assigned", "In progress", "Resolved", "Avg resolution (h)"])
                .map_err(csv_error)?;
            for p in store.technician_performance() {
                writer
                    .write_record([
                        p.username,
                        p.assigned.to_string(),
                        p.in_progress.to_string(),
                        p.resolved.to_string(),
                        p.average_resolution_hours
                            .map(|h| format!("{h:.1}"))
                            .unwrap_or_default(),
                    ])
                    .map_err(csv_error)?;
            }
        }
        FEEDBACK => {
            writer
                .write_record(["Ticket", "Rated by", "Rating", "Comment", "Submitted"])
                .map_err(csv_error)?;
            for t in store.all_tickets() {
                let Some(f) = t.feedback else { continue };
                if !in_range(f.created_at.date_naive(), request.start_date, request.end_date) {
                    continue;
                }
                writer
                    .write_record([
                        t.ticket_no,
                        f.rated_by,
                        f.rating.to_string(),
                        f.comment.unwrap_or_default(),
                        f.created_at.to_rfc3339(),
                    ])
                    .map_err(csv_error)?;
            }
        }
        other => {
            return Err(validation_error(
                "report_type",
                &format!("\"{other}\" is not a valid report type."),
            ));
        }
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalError(e.to_string()))
}
