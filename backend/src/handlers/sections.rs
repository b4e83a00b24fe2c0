use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use maintdesk_shared::{Section, SectionInput};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::validation::Validated;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SectionBody {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SectionPatchBody {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    pub description: Option<String>,
}

pub fn section_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sections/", get(list_sections).post(create_section))
        .route(
            "/sections/:id/",
            get(get_section).patch(update_section).delete(delete_section),
        )
}

async fn list_sections(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
) -> Json<Vec<Section>> {
    Json(state.store.read().await.sections())
}

async fn get_section(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Section>> {
    Ok(Json(state.store.read().await.section(id)?))
}

async fn create_section(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Validated(body): Validated<SectionBody>,
) -> ApiResult<(StatusCode, Json<Section>)> {
    current.require_staff()?;
    let section = state.store.write().await.create_section(SectionInput {
        name: body.name,
        description: body.description,
    })?;
    Ok((StatusCode::CREATED, Json(section)))
}

async fn update_section(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<SectionPatchBody>,
) -> ApiResult<Json<Section>> {
    current.require_staff()?;
    let mut store = state.store.write().await;
    let existing = store.section(id)?;
    let section = store.update_section(
        id,
        SectionInput {
            name: body.name.unwrap_or(existing.name),
            description: body.description.or(existing.description),
        },
    )?;
    Ok(Json(section))
}

async fn delete_section(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    current.require_staff()?;
    state.store.write().await.delete_section(id)?;
    Ok(StatusCode::NO_CONTENT)
}
