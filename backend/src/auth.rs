//! Token authentication for the development API.
//!
//! Clients send `Authorization: Token <40 hex chars>`. Tokens are opaque and
//! live only in memory.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use maintdesk_shared::{Actor, AuthResponse, RegisterRequest, Role, User, UserUpdate};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiResult, AppError};
use crate::validation::Validated;
use crate::AppState;

const TOKEN_PREFIX: &str = "Token ";

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor::from(&self.user)
    }

    /// Admins and managers.
    pub fn require_staff(&self) -> ApiResult<()> {
        if self.user.role.is_staff() {
            Ok(())
        } else {
            Err(permission_denied())
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        if self.user.role == Role::Admin {
            Ok(())
        } else {
            Err(permission_denied())
        }
    }
}

fn permission_denied() -> AppError {
    AppError::forbidden("You do not have permission to perform this action.")
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided.".to_string())
            })?;

        let token = header
            .strip_prefix(TOKEN_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid token header.".to_string()))?;

        let user = state
            .store
            .read()
            .await
            .user_for_token(token)
            .ok_or_else(|| AppError::Unauthorized("Invalid token.".to_string()))?;

        Ok(Self {
            user,
            token: token.to_string(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginBody {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterBody {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileBody {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login/", post(login))
        .route("/auth/register/", post(register))
        .route("/auth/logout/", post(logout))
        .route("/auth/profile/", get(profile).patch(update_profile))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Validated(body): Validated<LoginBody>,
) -> ApiResult<Json<AuthResponse>> {
    let mut store = state.store.write().await;
    let user = store
        .check_credentials(body.username.trim(), &body.password)
        .ok_or_else(|| {
            tracing::warn!(username = %body.username, "Failed login attempt");
            AppError::InvalidCredentials
        })?;
    let token = store.issue_token(user.id);
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        token,
        refresh_token: None,
        user,
    }))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Validated(body): Validated<RegisterBody>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let mut store = state.store.write().await;
    let user = store.register(RegisterRequest {
        username: body.username,
        password: body.password,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
    })?;
    let token = store.issue_token(user.id);
    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            refresh_token: None,
            user,
        }),
    ))
}

async fn logout(State(state): State<Arc<AppState>>, current: CurrentUser) -> StatusCode {
    state.store.write().await.revoke_token(&current.token);
    tracing::info!(user_id = current.user.id, "User logged out");
    StatusCode::NO_CONTENT
}

async fn profile(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

/// Users may change their own name and email, never their role or sections.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Validated(body): Validated<ProfileBody>,
) -> ApiResult<Json<User>> {
    let user = state.store.write().await.update_user(
        current.user.id,
        UserUpdate {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            role: None,
            sections: None,
        },
    )?;
    Ok(Json(user))
}
