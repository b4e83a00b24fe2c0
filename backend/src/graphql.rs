//! Mock GraphQL endpoint for local demos.
//!
//! A camelCase read view over the same store the REST API uses, plus a
//! single `createTicket` mutation. There is no authentication; new tickets
//! are raised by the configured demo user.

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject};
use async_graphql_axum::GraphQL;
use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use chrono::Utc;
use maintdesk_shared::{Facility, Section, Ticket, TicketAnalytics, User};
use std::sync::Arc;

use crate::AppState;

pub type MaintSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
pub struct GqlTicket {
    pub id: i64,
    pub ticket_no: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub section: Option<String>,
    pub facility: Option<String>,
    pub raised_by: String,
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub resolved_at: Option<String>,
}

impl From<Ticket> for GqlTicket {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            ticket_no: t.ticket_no,
            title: t.title,
            description: t.description,
            status: t.status.as_str().to_string(),
            section: t.section,
            facility: t.facility,
            raised_by: t.raised_by,
            assigned_to: t.assigned_to.map(|u| u.username),
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
            resolved_at: t.resolved_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct GqlTechnician {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub sections: Vec<i64>,
}

impl From<User> for GqlTechnician {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            sections: u.sections,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct GqlSection {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub technicians: Vec<String>,
}

impl From<Section> for GqlSection {
    fn from(s: Section) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            technicians: s.technicians,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct GqlFacility {
    pub id: i64,
    pub name: String,
    #[graphql(name = "type")]
    pub facility_type: String,
    pub status: String,
    pub location: Option<String>,
}

impl From<Facility> for GqlFacility {
    fn from(f: Facility) -> Self {
        Self {
            id: f.id,
            name: f.name,
            facility_type: f.facility_type.as_str().to_string(),
            status: f.status.as_str().to_string(),
            location: f.location,
        }
    }
}

#[derive(SimpleObject, Debug, Clone, Default)]
pub struct GqlStats {
    pub total: u64,
    pub open: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub pending: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl From<TicketAnalytics> for GqlStats {
    fn from(s: TicketAnalytics) -> Self {
        Self {
            total: s.total,
            open: s.open,
            assigned: s.assigned,
            in_progress: s.in_progress,
            pending: s.pending,
            resolved: s.resolved,
            closed: s.closed,
        }
    }
}

/// Arguments of the `tickets` query.
#[derive(Debug, Clone, Default)]
pub struct TicketSelection {
    pub status: Option<String>,
    pub section: Option<String>,
    pub technician: Option<String>,
    pub raised_by: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i32>,
    pub page_size: Option<i32>,
}

const SORT_FIELDS: &[&str] = &[
    "id", "ticketNo", "title", "description", "status", "section", "facility", "raisedBy",
    "assignedTo", "createdAt", "updatedAt", "resolvedAt",
];

/// String rendering of a ticket field, keyed by its GraphQL name.
fn field_text(t: &GqlTicket, field: &str) -> String {
    match field {
        "id" => t.id.to_string(),
        "ticketNo" => t.ticket_no.clone(),
        "title" => t.title.clone(),
        "description" => t.description.clone(),
        "status" => t.status.clone(),
        "section" => t.section.clone().unwrap_or_default(),
        "facility" => t.facility.clone().unwrap_or_default(),
        "raisedBy" => t.raised_by.clone(),
        "assignedTo" => t.assigned_to.clone().unwrap_or_default(),
        "createdAt" => t.created_at.clone(),
        "updatedAt" => t.updated_at.clone(),
        "resolvedAt" => t.resolved_at.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Filter, sort and page `tickets`.
///
/// Sorting compares string renderings, so `10` sorts before `9`. Pages are
/// zero-based: the slice starts at `page * pageSize`.
pub fn select_tickets(mut tickets: Vec<GqlTicket>, sel: &TicketSelection) -> Vec<GqlTicket> {
    tickets.retain(|t| {
        sel.status.as_deref().is_none_or(|s| t.status == s)
            && sel.section.as_deref().is_none_or(|s| t.section.as_deref() == Some(s))
            && sel.technician.as_deref().is_none_or(|s| t.assigned_to.as_deref() == Some(s))
            && sel.raised_by.as_deref().is_none_or(|s| t.raised_by == s)
    });

    if let Some(field) = sel.sort_field.as_deref() {
        if SORT_FIELDS.contains(&field) {
            let descending = sel
                .sort_order
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case("desc"));
            tickets.sort_by(|a, b| {
                let ord = field_text(a, field).cmp(&field_text(b, field));
                if descending { ord.reverse() } else { ord }
            });
        }
    }

    match sel.page_size {
        Some(size) if size > 0 => {
            let page = sel.page.unwrap_or(0).max(0) as usize;
            let size = size as usize;
            tickets.into_iter().skip(page * size).take(size).collect()
        }
        _ => tickets,
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[allow(clippy::too_many_arguments)]
    async fn tickets(
        &self,
        ctx: &Context<'_>,
        status: Option<String>,
        section: Option<String>,
        technician: Option<String>,
        raised_by: Option<String>,
        sort_field: Option<String>,
        sort_order: Option<String>,
        page: Option<i32>,
        page_size: Option<i32>,
    ) -> Result<Vec<GqlTicket>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let tickets = state
            .store
            .read()
            .await
            .all_tickets()
            .into_iter()
            .map(GqlTicket::from)
            .collect();
        let selection = TicketSelection {
            status,
            section,
            technician,
            raised_by,
            sort_field,
            sort_order,
            page,
            page_size,
        };
        Ok(select_tickets(tickets, &selection))
    }

    async fn ticket(&self, ctx: &Context<'_>, id: i64) -> Result<Option<GqlTicket>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let store = state.store.read().await;
        Ok(store
            .all_tickets()
            .into_iter()
            .find(|t| t.id == id)
            .map(GqlTicket::from))
    }

    async fn technicians(&self, ctx: &Context<'_>) -> Result<Vec<GqlTechnician>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let technicians = state.store.read().await.technicians();
        Ok(technicians.into_iter().map(GqlTechnician::from).collect())
    }

    async fn sections(&self, ctx: &Context<'_>) -> Result<Vec<GqlSection>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let sections = state.store.read().await.sections();
        Ok(sections.into_iter().map(GqlSection::from).collect())
    }

    async fn facilities(&self, ctx: &Context<'_>) -> Result<Vec<GqlFacility>> {
        let state = ctx.data::<Arc<AppState>>()?;
        let facilities = state.store.read().await.facilities();
        Ok(facilities.into_iter().map(GqlFacility::from).collect())
    }

    async fn stats(&self, ctx: &Context<'_>) -> Result<GqlStats> {
        let state = ctx.data::<Arc<AppState>>()?;
        let store = state.store.read().await;
        let stats = TicketAnalytics::from_statuses(store.all_tickets().iter().map(|t| t.status));
        Ok(stats.into())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Raise a ticket as the demo user. The new id is one past the largest
    /// existing id and the status starts at `open`.
    async fn create_ticket(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: String,
        section: String,
        facility: String,
    ) -> Result<GqlTicket> {
        let state = ctx.data::<Arc<AppState>>()?;
        let ticket = state.store.write().await.create_ticket_by_name(
            &state.config.demo_user,
            &title,
            &description,
            &section,
            &facility,
            Utc::now(),
        )?;
        Ok(ticket.into())
    }
}

pub fn build_schema(state: Arc<AppState>) -> MaintSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn graphql_router(state: Arc<AppState>) -> Router {
    Router::new().route(
        "/graphql",
        get(graphiql).post_service(GraphQL::new(build_schema(state))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: i64, status: &str, raised_by: &str) -> GqlTicket {
        GqlTicket {
            id,
            status: status.to_string(),
            raised_by: raised_by.to_string(),
            ..GqlTicket::default()
        }
    }

    fn ids(tickets: &[GqlTicket]) -> Vec<i64> {
        tickets.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_sort_is_string_based() {
        let tickets = vec![ticket(9, "open", "a"), ticket(10, "open", "a"), ticket(2, "open", "a")];
        let sel = TicketSelection {
            sort_field: Some("id".to_string()),
            sort_order: Some("asc".to_string()),
            ..TicketSelection::default()
        };
        assert_eq!(ids(&select_tickets(tickets, &sel)), vec![10, 2, 9]);
    }

    #[test]
    fn test_filter_and_page() {
        let tickets: Vec<GqlTicket> = (1..=7)
            .map(|id| ticket(id, if id % 2 == 0 { "closed" } else { "open" }, "jdoe"))
            .collect();
        let sel = TicketSelection {
            status: Some("open".to_string()),
            page: Some(1),
            page_size: Some(2),
            ..TicketSelection::default()
        };
        // open tickets are 1, 3, 5, 7; page 1 of size 2 starts at offset 2
        assert_eq!(ids(&select_tickets(tickets, &sel)), vec![5, 7]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_order() {
        let tickets = vec![ticket(3, "open", "a"), ticket(1, "open", "a")];
        let sel = TicketSelection {
            sort_field: Some("priority".to_string()),
            ..TicketSelection::default()
        };
        assert_eq!(ids(&select_tickets(tickets, &sel)), vec![3, 1]);
    }
}
