use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use maintdesk_shared::{Facility, FacilityInput, FacilityStatus, FacilityType};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::validation::Validated;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct FacilityBody {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters."))]
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub status: FacilityStatus,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FacilityPatchBody {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters."))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub facility_type: Option<FacilityType>,
    pub status: Option<FacilityStatus>,
    pub location: Option<String>,
}

pub fn facility_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/facilities/", get(list_facilities).post(create_facility))
        .route(
            "/facilities/:id/",
            get(get_facility).patch(update_facility).delete(delete_facility),
        )
}

async fn list_facilities(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
) -> Json<Vec<Facility>> {
    Json(state.store.read().await.facilities())
}

async fn get_facility(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Facility>> {
    Ok(Json(state.store.read().await.facility(id)?))
}

async fn create_facility(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Validated(body): Validated<FacilityBody>,
) -> ApiResult<(StatusCode, Json<Facility>)> {
    current.require_staff()?;
    let facility = state.store.write().await.create_facility(FacilityInput {
        name: body.name,
        facility_type: body.facility_type,
        status: body.status,
        location: body.location,
    })?;
    Ok((StatusCode::CREATED, Json(facility)))
}

async fn update_facility(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<FacilityPatchBody>,
) -> ApiResult<Json<Facility>> {
    current.require_staff()?;
    let mut store = state.store.write().await;
    let existing = store.facility(id)?;
    let facility = store.update_facility(
        id,
        FacilityInput {
            name: body.name.unwrap_or(existing.name),
            facility_type: body.facility_type.unwrap_or(existing.facility_type),
            status: body.status.unwrap_or(existing.status),
            location: body.location.or(existing.location),
        },
    )?;
    Ok(Json(facility))
}

async fn delete_facility(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    current.require_staff()?;
    state.store.write().await.delete_facility(id)?;
    Ok(StatusCode::NO_CONTENT)
}
