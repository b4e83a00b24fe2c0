use maintdesk_shared::query::TicketFilters;
use maintdesk_shared::workflow;
use maintdesk_shared::{Actor, CreateTicket, Role, Ticket};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::auth::use_auth;
use crate::components::layout::{home_route, Route};
use crate::components::tickets::{current_page, Pager, StatusCounts, TicketFilterBar, TicketTable};
use crate::components::toast::use_toaster;
use crate::components::workflow::{
    AdminTicketDetail, CommentThread, TechnicianStatusPanel, UserTicketDetail,
};
use crate::context::use_shared_data;
use crate::hooks::{use_facilities, use_sections, use_ticket, use_ticket_analytics, use_tickets};
use crate::services::tickets;

pub const DEFAULT_ORDERING: &str = "-created_at";
const PAGE_SIZE: u32 = 20;

fn page_callback(filters: &UseStateHandle<TicketFilters>) -> Callback<u32> {
    let filters = filters.clone();
    Callback::from(move |page: u32| {
        filters.set(TicketFilters {
            page: Some(page),
            ..(*filters).clone()
        })
    })
}

fn filters_callback(filters: &UseStateHandle<TicketFilters>) -> Callback<TicketFilters> {
    let filters = filters.clone();
    Callback::from(move |next: TicketFilters| filters.set(next))
}

// ============================================
// STAFF LIST
// ============================================

#[function_component(AdminTicketsPage)]
pub fn admin_tickets_page() -> Html {
    let shared = use_shared_data();
    let filters = use_state(|| TicketFilters {
        ordering: Some(DEFAULT_ORDERING.to_string()),
        page_size: Some(PAGE_SIZE),
        ..TicketFilters::default()
    });
    let tickets = use_tickets((*filters).clone());

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{"All tickets"}</h1>
                <Link<Route> to={Route::NewTicket} classes="bg-blue-600 hover:bg-blue-700 text-white px-4 py-1.5 rounded text-sm">
                    {"New Ticket"}
                </Link<Route>>
            </div>
            <TicketFilterBar
                filters={(*filters).clone()}
                sections={shared.sections.clone()}
                on_change={filters_callback(&filters)}
            />
            if let Some(error) = tickets.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }
            if tickets.loading {
                <p class="text-gray-500 text-sm">{"Loading tickets..."}</p>
            }
            <TicketTable tickets={tickets.data.results.clone()} />
            <Pager page={tickets.data.clone()} current={current_page(&filters)} on_page={page_callback(&filters)} />
        </div>
    }
}

// ============================================
// RAISER LIST
// ============================================

#[function_component(MyTicketsPage)]
pub fn my_tickets_page() -> Html {
    let auth = use_auth();
    let username = auth.user().map(|u| u.username.clone());
    let filters = use_state(|| TicketFilters {
        raised_by: username,
        ordering: Some(DEFAULT_ORDERING.to_string()),
        page_size: Some(PAGE_SIZE),
        ..TicketFilters::default()
    });
    let tickets = use_tickets((*filters).clone());
    let stats = use_ticket_analytics();

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{"My tickets"}</h1>
                <Link<Route> to={Route::NewTicket} classes="bg-blue-600 hover:bg-blue-700 text-white px-4 py-1.5 rounded text-sm">
                    {"Report a problem"}
                </Link<Route>>
            </div>
            <StatusCounts stats={stats.data.clone()} />
            <TicketFilterBar filters={(*filters).clone()} on_change={filters_callback(&filters)} />
            if let Some(error) = tickets.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }
            <TicketTable tickets={tickets.data.results.clone()} />
            <Pager page={tickets.data.clone()} current={current_page(&filters)} on_page={page_callback(&filters)} />
        </div>
    }
}

// ============================================
// NEW TICKET
// ============================================

#[function_component(NewTicketPage)]
pub fn new_ticket_page() -> Html {
    let sections = use_sections();
    let facilities = use_facilities();
    let toaster = use_toaster();
    let navigator = use_navigator();

    let title = use_state(String::new);
    let description = use_state(String::new);
    let section_id = use_state(|| None::<i64>);
    let facility_id = use_state(|| None::<i64>);
    let saving = use_state(|| false);

    let on_title = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            title.set(input.value());
        })
    };
    let on_description = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            description.set(area.value());
        })
    };
    let on_section = {
        let section_id = section_id.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            section_id.set(select.value().parse().ok());
        })
    };
    let on_facility = {
        let facility_id = facility_id.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            facility_id.set(select.value().parse().ok());
        })
    };

    let onsubmit = {
        let title = title.clone();
        let description = description.clone();
        let section_id = section_id.clone();
        let facility_id = facility_id.clone();
        let saving = saving.clone();
        let toaster = toaster.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(section_id), Some(facility_id)) = (*section_id, *facility_id) else {
                toaster.error("Please choose a section and a facility");
                return;
            };
            if title.trim().is_empty() || description.trim().is_empty() {
                toaster.error("Please fill in a title and a description");
                return;
            }
            let input = CreateTicket {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                section_id,
                facility_id,
            };
            let saving = saving.clone();
            let toaster = toaster.clone();
            let navigator = navigator.clone();
            saving.set(true);
            spawn_local(async move {
                let outcome = tickets::create(&input).await;
                saving.set(false);
                match outcome {
                    Ok(ticket) => {
                        toaster.success(format!("Ticket {} created", ticket.ticket_no));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::TicketDetail { id: ticket.id });
                        }
                    }
                    Err(e) => toaster.api_error("Failed to create ticket", &e),
                }
            });
        })
    };

    html! {
        <div class="max-w-2xl space-y-4">
            <h1 class="text-2xl font-bold text-gray-900">{"Report a maintenance problem"}</h1>
            <form class="bg-white shadow rounded p-4 space-y-3" {onsubmit}>
                <label class="block text-sm">
                    <span class="text-gray-700">{"Title"}</span>
                    <input class="mt-1 block w-full border rounded px-2 py-1" value={(*title).clone()} oninput={on_title} />
                </label>
                <label class="block text-sm">
                    <span class="text-gray-700">{"Description"}</span>
                    <textarea class="mt-1 block w-full border rounded px-2 py-1" rows="5" value={(*description).clone()} oninput={on_description} />
                </label>
                <label class="block text-sm">
                    <span class="text-gray-700">{"Section"}</span>
                    <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_section}>
                        <option value="" selected={section_id.is_none()}>{"Choose a section"}</option>
                        { for sections.data.iter().map(|s| html! {
                            <option value={s.id.to_string()} selected={*section_id == Some(s.id)}>{&s.name}</option>
                        }) }
                    </select>
                </label>
                <label class="block text-sm">
                    <span class="text-gray-700">{"Facility"}</span>
                    <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_facility}>
                        <option value="" selected={facility_id.is_none()}>{"Choose a facility"}</option>
                        { for facilities.data.iter().map(|f| html! {
                            <option value={f.id.to_string()} selected={*facility_id == Some(f.id)}>{&f.name}</option>
                        }) }
                    </select>
                </label>
                <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving}>
                    if *saving { {"Submitting..."} } else { {"Submit ticket"} }
                </button>
            </form>
        </div>
    }
}

// ============================================
// DETAIL
// ============================================

#[derive(Properties, PartialEq)]
pub struct TicketDetailPageProps {
    pub id: i64,
}

#[function_component(TicketDetailPage)]
pub fn ticket_detail_page(props: &TicketDetailPageProps) -> Html {
    let auth = use_auth();
    let ticket = use_ticket(props.id);
    let toaster = use_toaster();
    let navigator = use_navigator();

    let Some(user) = auth.user().cloned() else {
        return html! {};
    };

    let Some(current) = ticket.data.clone() else {
        return match ticket.error.as_ref() {
            Some(error) => html! { <p class="text-red-600">{error.to_string()}</p> },
            None => html! { <p class="text-gray-500">{"Loading ticket..."}</p> },
        };
    };

    let on_changed = ticket.refetch.clone();
    let on_delete = {
        let id = current.id;
        let role = user.role;
        let toaster = toaster.clone();
        Callback::from(move |_| {
            if !gloo::dialogs::confirm("Delete this ticket? This cannot be undone.") {
                return;
            }
            let toaster = toaster.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match tickets::delete(id).await {
                    Ok(()) => {
                        toaster.success("Ticket deleted");
                        if let Some(navigator) = navigator {
                            navigator.push(&home_route(role));
                        }
                    }
                    Err(e) => toaster.api_error("Failed to delete ticket", &e),
                }
            });
        })
    };

    let panel = match user.role {
        Role::Admin | Role::Manager => html! {
            <StaffTicketView ticket={current.clone()} on_changed={on_changed.clone()} />
        },
        Role::Technician => html! {
            <TechnicianStatusPanel ticket={current.clone()} on_changed={on_changed.clone()} />
        },
        Role::User => html! {
            <RaiserTicketView ticket={current.clone()} on_changed={on_changed.clone()} />
        },
    };

    html! {
        <div class="max-w-4xl space-y-4">
            {panel}
            <CommentThread ticket_id={current.id} />
            if workflow::can_delete(&current, &Actor::from(&user)) {
                <button class="px-4 py-2 text-sm text-red-700 border border-red-300 rounded" onclick={on_delete}>
                    {"Delete ticket"}
                </button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct TicketViewProps {
    ticket: Ticket,
    on_changed: Callback<()>,
}

#[function_component(StaffTicketView)]
fn staff_ticket_view(props: &TicketViewProps) -> Html {
    let shared = use_shared_data();
    html! {
        <AdminTicketDetail
            ticket={props.ticket.clone()}
            technicians={shared.technicians.clone()}
            sections={shared.sections.clone()}
            facilities={shared.facilities.clone()}
            on_changed={props.on_changed.clone()}
        />
    }
}

#[function_component(RaiserTicketView)]
fn raiser_ticket_view(props: &TicketViewProps) -> Html {
    let sections = use_sections();
    let facilities = use_facilities();
    html! {
        <UserTicketDetail
            ticket={props.ticket.clone()}
            sections={sections.data.clone()}
            facilities={facilities.data.clone()}
            on_changed={props.on_changed.clone()}
        />
    }
}
