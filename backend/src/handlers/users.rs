use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use maintdesk_shared::{NewUser, Page, Role, User, UserUpdate};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::pagination::{paginate, PaginationParams};
use crate::validation::Validated;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreateBody {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub sections: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserPatchBody {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub sections: Option<Vec<i64>>,
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users/me/", get(me))
        .route("/users/:id/", get(get_user).patch(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<Page<User>>> {
    current.require_staff()?;
    let users = state
        .store
        .read()
        .await
        .users(query.role, query.search.as_deref());
    let params = PaginationParams::new(query.page, query.page_size);
    Ok(Json(paginate(users, params, &uri)))
}

async fn me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    if current.user.id != id {
        current.require_staff()?;
    }
    Ok(Json(state.store.read().await.user(id)?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Validated(body): Validated<UserCreateBody>,
) -> ApiResult<(StatusCode, Json<User>)> {
    current.require_admin()?;
    let user = state.store.write().await.create_user(NewUser {
        username: body.username,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        role: body.role,
        sections: body.sections,
    })?;
    tracing::info!(user_id = user.id, by = %current.user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<UserPatchBody>,
) -> ApiResult<Json<User>> {
    current.require_admin()?;
    let update = UserUpdate {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        role: body.role,
        sections: body.sections,
    };
    Ok(Json(state.store.write().await.update_user(id, update)?))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    current.require_admin()?;
    state.store.write().await.delete_user(id)?;
    Ok(StatusCode::NO_CONTENT)
}
