use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;

pub mod analytics;
pub mod facilities;
pub mod reports;
pub mod sections;
pub mod tickets;
pub mod users;

pub use analytics::analytics_routes;
pub use facilities::facility_routes;
pub use reports::report_routes;
pub use sections::section_routes;
pub use tickets::ticket_routes;
pub use users::user_routes;

/// Every REST resource, relative to the `/api` prefix.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/", get(health_check))
        .merge(crate::auth::auth_routes())
        .merge(ticket_routes())
        .merge(user_routes())
        .merge(section_routes())
        .merge(facility_routes())
        .merge(analytics_routes())
        .merge(report_routes())
}

pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({"status": "healthy", "service": "maintdesk-api"})))
}
