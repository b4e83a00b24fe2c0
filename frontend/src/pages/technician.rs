use maintdesk_shared::query::TicketFilters;
use yew::prelude::*;

use crate::components::auth::use_auth;
use crate::components::tickets::{current_page, Pager, StatusCounts, TicketFilterBar, TicketTable};
use crate::hooks::{use_ticket_analytics, use_tickets};
use crate::pages::tickets::DEFAULT_ORDERING;

#[function_component(TechnicianDashboardPage)]
pub fn technician_dashboard_page() -> Html {
    let auth = use_auth();
    let me = auth.user().map(|u| u.id);
    let filters = use_state(|| TicketFilters {
        assigned_to: me,
        ordering: Some(DEFAULT_ORDERING.to_string()),
        ..TicketFilters::default()
    });
    let tickets = use_tickets((*filters).clone());
    let stats = use_ticket_analytics();

    let on_filters = {
        let filters = filters.clone();
        Callback::from(move |next: TicketFilters| filters.set(next))
    };
    let on_page = {
        let filters = filters.clone();
        Callback::from(move |page: u32| {
            filters.set(TicketFilters {
                page: Some(page),
                ..(*filters).clone()
            })
        })
    };

    html! {
        <div class="space-y-4">
            <h1 class="text-2xl font-bold text-gray-900">{"My work"}</h1>
            <StatusCounts stats={stats.data.clone()} />
            <TicketFilterBar filters={(*filters).clone()} on_change={on_filters} />
            if let Some(error) = tickets.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }
            <TicketTable tickets={tickets.data.results.clone()} show_assignee={false} />
            <Pager page={tickets.data.clone()} current={current_page(&filters)} {on_page} />
        </div>
    }
}
