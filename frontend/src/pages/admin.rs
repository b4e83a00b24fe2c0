use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::layout::Route;
use crate::components::tickets::{StatCard, StatusBadge, StatusCounts};
use crate::context::use_shared_data;

/// Average resolution time as shown in the performance table.
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{h:.1} h"),
        None => "n/a".to_string(),
    }
}

#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page() -> Html {
    let shared = use_shared_data();
    let dashboard = &shared.analytics;

    let refresh = {
        let refetch = shared.refetch_all.clone();
        Callback::from(move |_| refetch.emit(()))
    };

    html! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{"Dashboard"}</h1>
                <button class="px-3 py-1 border rounded text-sm" onclick={refresh} disabled={shared.is_loading}>
                    if shared.is_loading { {"Refreshing..."} } else { {"Refresh"} }
                </button>
            </div>

            if let Some(error) = shared.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }

            <StatusCounts stats={dashboard.ticket_stats.clone()} />

            <div class="grid grid-cols-2 md:grid-cols-4 gap-3">
                <StatCard label="Users" value={dashboard.total_users} />
                <StatCard label="Technicians" value={dashboard.total_technicians} />
                <StatCard label="Sections" value={dashboard.total_sections} />
                <StatCard label="Facilities" value={dashboard.total_facilities} />
            </div>

            <section class="bg-white shadow rounded p-4">
                <h2 class="text-lg font-semibold mb-3">{"Technician performance"}</h2>
                <table class="min-w-full text-sm">
                    <thead>
                        <tr class="text-left text-gray-500">
                            <th class="py-1">{"Technician"}</th>
                            <th>{"Assigned"}</th>
                            <th>{"In progress"}</th>
                            <th>{"Resolved"}</th>
                            <th>{"Avg. resolution"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for dashboard.technician_performance.iter().map(|p| html! {
                            <tr key={p.technician_id} class="border-t">
                                <td class="py-1">{&p.username}</td>
                                <td>{p.assigned}</td>
                                <td>{p.in_progress}</td>
                                <td>{p.resolved}</td>
                                <td>{format_hours(p.average_resolution_hours)}</td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </section>

            <section class="bg-white shadow rounded p-4">
                <h2 class="text-lg font-semibold mb-3">
                    {format!("Overdue tickets ({})", dashboard.overdue_tickets.len())}
                </h2>
                if dashboard.overdue_tickets.is_empty() {
                    <p class="text-sm text-gray-500">{"Nothing overdue."}</p>
                } else {
                    <ul class="divide-y">
                        { for dashboard.overdue_tickets.iter().map(|t| html! {
                            <li key={t.id} class="py-2 flex items-center justify-between text-sm">
                                <Link<Route> to={Route::TicketDetail { id: t.id }} classes="text-blue-600 hover:underline">
                                    {format!("{} {}", t.ticket_no, t.title)}
                                </Link<Route>>
                                <span class="flex items-center space-x-3">
                                    <StatusBadge status={t.status} />
                                    <span>{t.assigned_to.clone().unwrap_or_else(|| "Unassigned".to_string())}</span>
                                    <span class="text-red-600">{format!("{} h old", t.age_hours)}</span>
                                </span>
                            </li>
                        }) }
                    </ul>
                }
            </section>
        </div>
    }
}
