use maintdesk_shared::Role;
use yew::prelude::*;
use yew_router::prelude::*;

use super::auth::use_auth;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/admin")]
    AdminDashboard,
    #[at("/admin/tickets")]
    AdminTickets,
    #[at("/technician")]
    TechnicianDashboard,
    #[at("/my-tickets")]
    MyTickets,
    #[at("/tickets/new")]
    NewTicket,
    #[at("/tickets/:id")]
    TicketDetail { id: i64 },
    #[at("/facilities")]
    Facilities,
    #[at("/sections")]
    Sections,
    #[at("/users")]
    Users,
    #[at("/reports")]
    Reports,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Pages that only admins and managers may open.
    pub fn is_staff_only(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard
                | Self::AdminTickets
                | Self::Facilities
                | Self::Sections
                | Self::Users
                | Self::Reports
        )
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::NotFound)
    }
}

/// Landing page after sign-in.
pub fn home_route(role: Role) -> Route {
    match role {
        Role::Admin | Role::Manager => Route::AdminDashboard,
        Role::Technician => Route::TechnicianDashboard,
        Role::User => Route::MyTickets,
    }
}

pub fn nav_items(role: Role) -> Vec<(Route, &'static str)> {
    match role {
        Role::Admin | Role::Manager => vec![
            (Route::AdminDashboard, "Dashboard"),
            (Route::AdminTickets, "Tickets"),
            (Route::Facilities, "Facilities"),
            (Route::Sections, "Sections"),
            (Route::Users, "Users"),
            (Route::Reports, "Reports"),
        ],
        Role::Technician => vec![(Route::TechnicianDashboard, "My Work")],
        Role::User => vec![
            (Route::MyTickets, "My Tickets"),
            (Route::NewTicket, "New Ticket"),
        ],
    }
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Html,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    let auth_ctx = use_auth();
    let current_route = use_route::<Route>().unwrap_or(Route::Home);

    let Some(user) = auth_ctx.user().cloned() else {
        return props.children.clone();
    };

    let on_logout = {
        let logout = auth_ctx.logout.clone();
        Callback::from(move |_| logout.emit(()))
    };

    html! {
        <div class="min-h-screen bg-gray-100 flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700 h-14 flex-shrink-0">
                <div class="h-full flex items-center justify-between px-4">
                    <div class="flex items-center space-x-6">
                        <div class="flex items-center space-x-2">
                            <div class="w-8 h-8 bg-blue-500 rounded flex items-center justify-center">
                                <span class="text-white font-bold text-lg">{"M"}</span>
                            </div>
                            <span class="text-white font-semibold text-lg">{"MaintDesk"}</span>
                        </div>
                        <nav class="flex items-center space-x-1">
                            { for nav_items(user.role).into_iter().map(|(route, label)| html! {
                                <NavTab {route} {label} current={current_route.clone()} />
                            }) }
                        </nav>
                    </div>
                    <div class="flex items-center space-x-4">
                        <span class="text-gray-300 text-sm">
                            {user.display_name()}
                            <span class="ml-2 text-xs uppercase text-gray-400">{user.role.as_str()}</span>
                        </span>
                        <button
                            onclick={on_logout}
                            class="text-gray-300 hover:text-white text-sm border border-gray-600 rounded px-3 py-1"
                        >
                            {"Sign out"}
                        </button>
                    </div>
                </div>
            </header>
            <main class="flex-1 overflow-auto p-6">
                {props.children.clone()}
            </main>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct NavTabProps {
    route: Route,
    label: &'static str,
    current: Route,
}

#[function_component(NavTab)]
fn nav_tab(props: &NavTabProps) -> Html {
    let class = if props.route == props.current {
        "px-3 py-1.5 rounded text-sm font-medium bg-blue-600 text-white"
    } else {
        "px-3 py-1.5 rounded text-sm font-medium text-gray-300 hover:bg-gray-700 hover:text-white"
    };
    html! {
        <Link<Route> to={props.route.clone()} classes={class}>
            {props.label}
        </Link<Route>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_route_per_role() {
        assert_eq!(home_route(Role::Admin), Route::AdminDashboard);
        assert_eq!(home_route(Role::Manager), Route::AdminDashboard);
        assert_eq!(home_route(Role::Technician), Route::TechnicianDashboard);
        assert_eq!(home_route(Role::User), Route::MyTickets);
    }

    #[test]
    fn test_navigation_only_lists_reachable_pages() {
        for role in [Role::User, Role::Technician] {
            assert!(nav_items(role).iter().all(|(route, _)| !route.is_staff_only()));
        }
        assert!(nav_items(Role::Manager).iter().any(|(route, _)| *route == Route::Reports));
    }
}
