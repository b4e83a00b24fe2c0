use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use maintdesk_shared::{AdminDashboard, TechnicianPerformance, TicketAnalytics};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::AppState;

pub fn analytics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics/tickets/", get(ticket_analytics))
        .route("/analytics/technicians/", get(technician_analytics))
        .route("/analytics/admin-dashboard/", get(admin_dashboard))
}

/// Counts over the tickets the caller can see.
async fn ticket_analytics(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Json<TicketAnalytics> {
    Json(state.store.read().await.ticket_analytics(&current.actor()))
}

async fn technician_analytics(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<TechnicianPerformance>>> {
    current.require_staff()?;
    Ok(Json(state.store.read().await.technician_performance()))
}

async fn admin_dashboard(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<AdminDashboard>> {
    current.require_staff()?;
    let dashboard = state
        .store
        .read()
        .await
        .admin_dashboard(Utc::now(), state.config.overdue_after_hours);
    Ok(Json(dashboard))
}
