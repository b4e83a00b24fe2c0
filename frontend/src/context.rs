//! Application-wide reference data for the staff views.

use maintdesk_shared::query::UserQuery;
use maintdesk_shared::reference::{any_loading, technicians_from_users};
use maintdesk_shared::{AdminDashboard, ApiError, Facility, Section, User};
use yew::prelude::*;

use crate::hooks::{use_admin_dashboard, use_facilities, use_sections, use_users};

/// Sections, facilities, every user and the dashboard analytics, fetched
/// once when the provider mounts.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedData {
    pub sections: Vec<Section>,
    pub facilities: Vec<Facility>,
    pub users: Vec<User>,
    pub technicians: Vec<User>,
    pub analytics: AdminDashboard,
    pub is_loading: bool,
    pub error: Option<ApiError>,
    pub refetch_sections: Callback<()>,
    pub refetch_facilities: Callback<()>,
    pub refetch_users: Callback<()>,
    pub refetch_analytics: Callback<()>,
    pub refetch_all: Callback<()>,
}

#[derive(Properties, PartialEq)]
pub struct SharedDataProviderProps {
    pub children: Children,
}

#[function_component(SharedDataProvider)]
pub fn shared_data_provider(props: &SharedDataProviderProps) -> Html {
    let sections = use_sections();
    let facilities = use_facilities();
    let users = use_users(UserQuery::all());
    let analytics = use_admin_dashboard();

    let refetch_all = {
        let callbacks = [
            sections.refetch.clone(),
            facilities.refetch.clone(),
            users.refetch.clone(),
            analytics.refetch.clone(),
        ];
        Callback::from(move |_| {
            for refetch in &callbacks {
                refetch.emit(());
            }
        })
    };

    let error = [&sections.error, &facilities.error, &users.error, &analytics.error]
        .into_iter()
        .find_map(|e| e.clone());

    let context = SharedData {
        technicians: technicians_from_users(&users.data.results),
        is_loading: any_loading(&[
            sections.loading,
            facilities.loading,
            users.loading,
            analytics.loading,
        ]),
        error,
        sections: sections.data.clone(),
        facilities: facilities.data.clone(),
        users: users.data.results.clone(),
        analytics: analytics.data.clone(),
        refetch_sections: sections.refetch.clone(),
        refetch_facilities: facilities.refetch.clone(),
        refetch_users: users.refetch.clone(),
        refetch_analytics: analytics.refetch.clone(),
        refetch_all,
    };

    html! {
        <ContextProvider<SharedData> {context}>
            {props.children.clone()}
        </ContextProvider<SharedData>>
    }
}

/// Panics outside a [`SharedDataProvider`].
#[hook]
pub fn use_shared_data() -> SharedData {
    use_context::<SharedData>().expect("use_shared_data must be used within a SharedDataProvider")
}
