use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use maintdesk_shared::{
    Comment, CreateTicket, Feedback, NewFeedback, Page, Ticket, TicketStatus, TicketUpdate,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::error::{validation_error, ApiResult};
use crate::pagination::{paginate, PaginationParams};
use crate::store::TicketListQuery;
use crate::validation::Validated;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct TicketCreateBody {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: String,
    pub section_id: i64,
    pub facility_id: i64,
}

/// Partial update. Unknown and read-only keys are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct TicketPatchBody {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub section_id: Option<i64>,
    pub facility_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    #[validate(length(max = 500))]
    pub pending_reason: Option<String>,
}

impl From<TicketPatchBody> for TicketUpdate {
    fn from(body: TicketPatchBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            status: body.status,
            section_id: body.section_id,
            facility_id: body.facility_id,
            assigned_to_id: body.assigned_to_id,
            pending_reason: body.pending_reason,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentBody {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters."))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackBody {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
    pub rating: i64,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

pub fn ticket_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickets/", get(list_tickets).post(create_ticket))
        .route(
            "/tickets/:id/",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
        .route("/tickets/:id/comments/", get(list_comments).post(add_comment))
        .route("/tickets/:id/feedback/", get(list_feedback).post(add_feedback))
}

async fn list_tickets(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<TicketListQuery>,
) -> ApiResult<Json<Page<Ticket>>> {
    let tickets = state.store.read().await.tickets(&current.actor(), &query);
    let params = PaginationParams::new(query.page, query.page_size);
    Ok(Json(paginate(tickets, params, &uri)))
}

async fn create_ticket(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Validated(body): Validated<TicketCreateBody>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let input = CreateTicket {
        title: body.title,
        description: body.description,
        section_id: body.section_id,
        facility_id: body.facility_id,
    };
    let ticket = state
        .store
        .write()
        .await
        .create_ticket(&current.actor(), input, Utc::now())?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn get_ticket(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.store.read().await.ticket(&current.actor(), id)?))
}

async fn update_ticket(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<TicketPatchBody>,
) -> ApiResult<Json<Ticket>> {
    let update = TicketUpdate::from(body);
    if update.is_empty() {
        return Err(validation_error("non_field_errors", "No writable fields supplied."));
    }
    let ticket = state
        .store
        .write()
        .await
        .update_ticket(&current.actor(), id, update, Utc::now())?;
    Ok(Json(ticket))
}

async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.write().await.delete_ticket(&current.actor(), id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_comments(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.store.read().await.comments(&current.actor(), id)?))
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<CommentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .store
        .write()
        .await
        .add_comment(&current.actor(), id, &body.text, Utc::now())?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list_feedback(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Feedback>>> {
    Ok(Json(state.store.read().await.feedback(&current.actor(), id)?))
}

async fn add_feedback(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Validated(body): Validated<FeedbackBody>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let input = NewFeedback {
        // range-checked above
        rating: body.rating as u8,
        comment: body.comment,
    };
    let feedback = state
        .store
        .write()
        .await
        .add_feedback(&current.actor(), id, input, Utc::now())?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
