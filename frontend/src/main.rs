use maintdesk_shared::Role;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod context;
mod hooks;
mod pages;
mod services;
mod session;

use components::auth::{use_auth, AuthProvider};
use components::layout::{home_route, Layout, Route};
use components::toast::ToastProvider;
use context::SharedDataProvider;
use pages::{
    admin::AdminDashboardPage,
    facilities::FacilitiesPage,
    login::{LoginPage, RegisterPage},
    reports::ReportsPage,
    sections::SectionsPage,
    technician::TechnicianDashboardPage,
    tickets::{AdminTicketsPage, MyTicketsPage, NewTicketPage, TicketDetailPage},
    users::UsersPage,
};

const TAILWIND_CSS: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";

/// Where `route` actually leads for a visitor with `role`: signed-out
/// visitors go to the login page and staff pages send everyone else home.
pub fn guard(route: &Route, role: Option<Role>) -> Option<Route> {
    match role {
        None if !route.is_public() => Some(Route::Login),
        None => None,
        Some(role) if *route == Route::Home => Some(home_route(role)),
        Some(role) if route.is_staff_only() && !role.is_staff() => Some(home_route(role)),
        Some(_) => None,
    }
}

fn switch(route: Route) -> Html {
    html! { <Guarded {route} /> }
}

#[derive(Properties, PartialEq)]
struct GuardedProps {
    route: Route,
}

#[function_component(Guarded)]
fn guarded(props: &GuardedProps) -> Html {
    let auth = use_auth();
    if let Some(target) = guard(&props.route, auth.user().map(|u| u.role)) {
        return html! { <Redirect<Route> to={target} /> };
    }

    match props.route.clone() {
        Route::Home => html! {},
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::AdminDashboard => html! { <AdminDashboardPage /> },
        Route::AdminTickets => html! { <AdminTicketsPage /> },
        Route::TechnicianDashboard => html! { <TechnicianDashboardPage /> },
        Route::MyTickets => html! { <MyTicketsPage /> },
        Route::NewTicket => html! { <NewTicketPage /> },
        Route::TicketDetail { id } => html! { <TicketDetailPage {id} /> },
        Route::Facilities => html! { <FacilitiesPage /> },
        Route::Sections => html! { <SectionsPage /> },
        Route::Users => html! { <UsersPage /> },
        Route::Reports => html! { <ReportsPage /> },
        Route::NotFound => html! {
            <div class="min-h-screen flex items-center justify-center">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-gray-900">{"404"}</h1>
                    <p class="text-xl mt-4 text-gray-500">{"Page Not Found"}</p>
                </div>
            </div>
        },
    }
}

#[function_component(AppRouter)]
fn app_router() -> Html {
    let auth = use_auth();

    let routes = html! {
        <Layout>
            <Switch<Route> render={switch} />
        </Layout>
    };

    // Reference data is only loaded for the staff views.
    let content = match auth.user() {
        Some(user) if user.role.is_staff() => html! {
            <SharedDataProvider>{routes}</SharedDataProvider>
        },
        _ => routes,
    };

    html! {
        <BrowserRouter>
            {content}
        </BrowserRouter>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <ToastProvider>
            <AuthProvider>
                <AppRouter />
            </AuthProvider>
        </ToastProvider>
    }
}

fn load_stylesheet(href: &str) {
    let document = gloo::utils::document();
    let Some(head) = document.head() else {
        return;
    };
    let Ok(link) = document.create_element("link") else {
        return;
    };
    let attached = link
        .set_attribute("href", href)
        .and_then(|_| link.set_attribute("rel", "stylesheet"))
        .and_then(|_| head.append_child(&link).map(|_| ()));
    if attached.is_err() {
        gloo::console::warn!(format!("Could not load stylesheet {href}"));
    }
}

fn main() {
    load_stylesheet(TAILWIND_CSS);
    yew::Renderer::<App>::new().render();
}
