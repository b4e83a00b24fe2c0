//! Ticket list building blocks shared by the dashboards.

use chrono::{DateTime, Utc};
use maintdesk_shared::query::TicketFilters;
use maintdesk_shared::{Page, Section, Ticket, TicketAnalytics, TicketStatus};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use super::layout::Route;

pub fn status_badge_class(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "bg-blue-100 text-blue-800",
        TicketStatus::Assigned => "bg-indigo-100 text-indigo-800",
        TicketStatus::InProgress => "bg-yellow-100 text-yellow-800",
        TicketStatus::Pending => "bg-orange-100 text-orange-800",
        TicketStatus::Resolved => "bg-green-100 text-green-800",
        TicketStatus::Closed => "bg-gray-100 text-gray-800",
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// 1-based page number the list is showing.
pub fn current_page(filters: &TicketFilters) -> u32 {
    filters.page.unwrap_or(1).max(1)
}

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: TicketStatus,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    html! {
        <span class={classes!("px-2", "py-1", "text-xs", "font-semibold", "rounded-full", status_badge_class(props.status))}>
            {props.status.label()}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct TicketTableProps {
    pub tickets: Vec<Ticket>,
    #[prop_or(true)]
    pub show_assignee: bool,
}

#[function_component(TicketTable)]
pub fn ticket_table(props: &TicketTableProps) -> Html {
    if props.tickets.is_empty() {
        return html! { <p class="text-gray-500 text-sm py-6 text-center">{"No tickets found."}</p> };
    }

    html! {
        <table class="min-w-full divide-y divide-gray-200 bg-white shadow rounded">
            <thead class="bg-gray-50">
                <tr>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Ticket"}</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Title"}</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Status"}</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Section"}</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Facility"}</th>
                    if props.show_assignee {
                        <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Assigned to"}</th>
                    }
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">{"Created"}</th>
                </tr>
            </thead>
            <tbody class="divide-y divide-gray-200">
                { for props.tickets.iter().map(|ticket| html! {
                    <tr key={ticket.id} class="hover:bg-gray-50">
                        <td class="px-4 py-2 text-sm font-mono">
                            <Link<Route> to={Route::TicketDetail { id: ticket.id }} classes="text-blue-600 hover:underline">
                                {&ticket.ticket_no}
                            </Link<Route>>
                        </td>
                        <td class="px-4 py-2 text-sm">{&ticket.title}</td>
                        <td class="px-4 py-2"><StatusBadge status={ticket.status} /></td>
                        <td class="px-4 py-2 text-sm">{ticket.section.clone().unwrap_or_default()}</td>
                        <td class="px-4 py-2 text-sm">{ticket.facility.clone().unwrap_or_default()}</td>
                        if props.show_assignee {
                            <td class="px-4 py-2 text-sm">
                                { ticket.assigned_to.as_ref().map(|u| u.display_name()).unwrap_or_else(|| "Unassigned".to_string()) }
                            </td>
                        }
                        <td class="px-4 py-2 text-sm text-gray-500">{format_timestamp(&ticket.created_at)}</td>
                    </tr>
                }) }
            </tbody>
        </table>
    }
}

#[derive(Properties, PartialEq)]
pub struct PagerProps {
    pub page: Page<Ticket>,
    pub current: u32,
    pub on_page: Callback<u32>,
}

#[function_component(Pager)]
pub fn pager(props: &PagerProps) -> Html {
    let current = props.current;
    let prev = {
        let on_page = props.on_page.clone();
        Callback::from(move |_| on_page.emit(current.saturating_sub(1).max(1)))
    };
    let next = {
        let on_page = props.on_page.clone();
        Callback::from(move |_| on_page.emit(current + 1))
    };

    html! {
        <div class="flex items-center justify-between py-3 text-sm text-gray-600">
            <span>{format!("{} tickets", props.page.count)}</span>
            <div class="space-x-2">
                <button class="px-3 py-1 border rounded disabled:opacity-50" disabled={props.page.previous.is_none()} onclick={prev}>
                    {"Previous"}
                </button>
                <span>{format!("Page {current}")}</span>
                <button class="px-3 py-1 border rounded disabled:opacity-50" disabled={props.page.next.is_none()} onclick={next}>
                    {"Next"}
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TicketFilterBarProps {
    pub filters: TicketFilters,
    #[prop_or_default]
    pub sections: Vec<Section>,
    pub on_change: Callback<TicketFilters>,
}

/// Status, section and free-text search. Any change resets to the first page.
#[function_component(TicketFilterBar)]
pub fn ticket_filter_bar(props: &TicketFilterBarProps) -> Html {
    let on_status = {
        let filters = props.filters.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_change.emit(TicketFilters {
                status: select.value().parse().ok(),
                page: None,
                ..filters.clone()
            });
        })
    };

    let on_section = {
        let filters = props.filters.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_change.emit(TicketFilters {
                section: select.value().parse().ok(),
                page: None,
                ..filters.clone()
            });
        })
    };

    let on_search = {
        let filters = props.filters.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            on_change.emit(TicketFilters {
                search: (!value.trim().is_empty()).then(|| value.trim().to_string()),
                page: None,
                ..filters.clone()
            });
        })
    };

    let selected_status = props.filters.status;
    let selected_section = props.filters.section;

    html! {
        <div class="flex flex-wrap items-center gap-3 mb-4">
            <select class="border rounded px-2 py-1 text-sm" onchange={on_status}>
                <option value="" selected={selected_status.is_none()}>{"All statuses"}</option>
                { for TicketStatus::ALL.iter().map(|s| html! {
                    <option value={s.as_str()} selected={selected_status == Some(*s)}>{s.label()}</option>
                }) }
            </select>
            if !props.sections.is_empty() {
                <select class="border rounded px-2 py-1 text-sm" onchange={on_section}>
                    <option value="" selected={selected_section.is_none()}>{"All sections"}</option>
                    { for props.sections.iter().map(|s| html! {
                        <option value={s.id.to_string()} selected={selected_section == Some(s.id)}>{&s.name}</option>
                    }) }
                </select>
            }
            <input
                type="search"
                class="border rounded px-2 py-1 text-sm"
                placeholder="Search tickets"
                value={props.filters.search.clone().unwrap_or_default()}
                onchange={on_search}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub label: AttrValue,
    pub value: u64,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-white shadow rounded p-4">
            <div class="text-sm text-gray-500">{&props.label}</div>
            <div class="text-2xl font-semibold text-gray-900">{props.value}</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusCountsProps {
    pub stats: TicketAnalytics,
}

/// One card for the total, then one per status.
#[function_component(StatusCounts)]
pub fn status_counts(props: &StatusCountsProps) -> Html {
    html! {
        <div class="grid grid-cols-2 md:grid-cols-7 gap-3">
            <StatCard label="Total" value={props.stats.total} />
            { for TicketStatus::ALL.iter().map(|s| html! {
                <StatCard label={s.label()} value={props.stats.count(*s)} />
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_every_status_has_a_distinct_badge() {
        let mut classes: Vec<_> = TicketStatus::ALL.iter().map(|s| status_badge_class(*s)).collect();
        classes.sort();
        classes.dedup();
        assert_eq!(classes.len(), TicketStatus::ALL.len());
    }

    #[test]
    fn test_format_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 11, 7, 5, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2024-05-11 07:05");
    }

    #[test]
    fn test_current_page_defaults_to_first() {
        assert_eq!(current_page(&TicketFilters::default()), 1);
        let filters = TicketFilters {
            page: Some(3),
            ..TicketFilters::default()
        };
        assert_eq!(current_page(&filters), 3);
    }
}
