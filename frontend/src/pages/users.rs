use maintdesk_shared::query::UserQuery;
use maintdesk_shared::{NewUser, Role, Section, User, UserUpdate};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::auth::use_auth;
use crate::components::toast::use_toaster;
use crate::context::use_shared_data;
use crate::hooks::{use_create_user, use_update_user, use_users};
use crate::services::users;

const ROLES: [Role; 4] = [Role::User, Role::Technician, Role::Manager, Role::Admin];

/// Add `section` to `sections` or take it out.
pub fn toggle_section(sections: &[i64], section: i64) -> Vec<i64> {
    if sections.contains(&section) {
        sections.iter().copied().filter(|s| *s != section).collect()
    } else {
        let mut next = sections.to_vec();
        next.push(section);
        next.sort_unstable();
        next
    }
}

fn blank_user() -> NewUser {
    NewUser {
        username: String::new(),
        password: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        role: Role::User,
        sections: Vec::new(),
    }
}

fn input_setter(
    draft: &UseStateHandle<NewUser>,
    apply: fn(&mut NewUser, String),
) -> Callback<InputEvent> {
    let draft = draft.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = (*draft).clone();
        apply(&mut next, input.value());
        draft.set(next);
    })
}

#[function_component(UsersPage)]
pub fn users_page() -> Html {
    let auth = use_auth();
    let shared = use_shared_data();
    let toaster = use_toaster();
    let query = use_state(UserQuery::default);
    let list = use_users((*query).clone());
    let create = use_create_user();
    let update = use_update_user();
    let draft = use_state(blank_user);

    let is_admin = auth.user().is_some_and(|u| u.role == Role::Admin);

    let refresh = {
        let local = list.refetch.clone();
        let shared_users = shared.refetch_users.clone();
        Callback::from(move |_| {
            local.emit(());
            shared_users.emit(());
        })
    };

    let on_role_filter = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            query.set(UserQuery {
                role: select.value().parse().ok(),
                page: None,
                ..(*query).clone()
            });
        })
    };

    let on_new_role = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.role = select.value().parse().unwrap_or(Role::User);
            draft.set(next);
        })
    };

    let onsubmit = {
        let create = create.clone();
        let draft = draft.clone();
        let toaster = toaster.clone();
        let refresh = refresh.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let input = (*draft).clone();
            if input.username.trim().is_empty() || input.password.is_empty() {
                toaster.error("Username and password are required");
                return;
            }
            let create = create.clone();
            let draft = draft.clone();
            let toaster = toaster.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match create.call(input).await {
                    Ok(user) => {
                        toaster.success(format!("Created {}", user.username));
                        draft.set(blank_user());
                        refresh.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to create user", &e),
                }
            });
        })
    };

    let save = {
        let update = update.clone();
        let toaster = toaster.clone();
        let refresh = refresh.clone();
        move |id: i64, change: UserUpdate| {
            let update = update.clone();
            let toaster = toaster.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match update.call(id, change).await {
                    Ok(user) => {
                        toaster.success(format!("Updated {}", user.username));
                        refresh.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to update user", &e),
                }
            });
        }
    };

    let on_row_role = |user: &User| {
        let id = user.id;
        let save = save.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(role) = select.value().parse::<Role>() {
                save(id, UserUpdate { role: Some(role), ..UserUpdate::default() });
            }
        })
    };

    let on_row_section = |user: &User, section: &Section| {
        let id = user.id;
        let sections = toggle_section(&user.sections, section.id);
        let save = save.clone();
        Callback::from(move |_: Event| {
            save(id, UserUpdate { sections: Some(sections.clone()), ..UserUpdate::default() });
        })
    };

    let on_delete = |user: &User| {
        let id = user.id;
        let username = user.username.clone();
        let toaster = toaster.clone();
        let refresh = refresh.clone();
        Callback::from(move |_| {
            if !gloo::dialogs::confirm(&format!("Delete user {username}?")) {
                return;
            }
            let toaster = toaster.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match users::delete(id).await {
                    Ok(()) => {
                        toaster.success("User deleted");
                        refresh.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to delete user", &e),
                }
            });
        })
    };

    html! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold text-gray-900">{"Users"}</h1>
                <select class="border rounded px-2 py-1 text-sm" onchange={on_role_filter}>
                    <option value="" selected={query.role.is_none()}>{"All roles"}</option>
                    { for ROLES.iter().map(|r| html! {
                        <option value={r.as_str()} selected={query.role == Some(*r)}>{r.as_str()}</option>
                    }) }
                </select>
            </div>

            if is_admin {
                <form class="bg-white shadow rounded p-4 grid grid-cols-1 md:grid-cols-4 gap-3" {onsubmit}>
                    <input class="border rounded px-2 py-1" placeholder="Username" value={draft.username.clone()}
                        oninput={input_setter(&draft, |u, v| u.username = v)} />
                    <input class="border rounded px-2 py-1" type="password" placeholder="Password" value={draft.password.clone()}
                        oninput={input_setter(&draft, |u, v| u.password = v)} />
                    <input class="border rounded px-2 py-1" placeholder="First name" value={draft.first_name.clone()}
                        oninput={input_setter(&draft, |u, v| u.first_name = v)} />
                    <input class="border rounded px-2 py-1" placeholder="Last name" value={draft.last_name.clone()}
                        oninput={input_setter(&draft, |u, v| u.last_name = v)} />
                    <input class="border rounded px-2 py-1" type="email" placeholder="Email" value={draft.email.clone()}
                        oninput={input_setter(&draft, |u, v| u.email = v)} />
                    <select class="border rounded px-2 py-1" onchange={on_new_role}>
                        { for ROLES.iter().map(|r| html! {
                            <option value={r.as_str()} selected={draft.role == *r}>{r.as_str()}</option>
                        }) }
                    </select>
                    <button type="submit" class="px-4 py-1.5 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={create.0.loading()}>
                        {"Add user"}
                    </button>
                </form>
            }

            if let Some(error) = list.error.as_ref() {
                <p class="text-red-600 text-sm">{error.to_string()}</p>
            }

            <table class="min-w-full bg-white shadow rounded text-sm">
                <thead class="bg-gray-50 text-left text-gray-500">
                    <tr>
                        <th class="px-4 py-2">{"User"}</th>
                        <th class="px-4 py-2">{"Email"}</th>
                        <th class="px-4 py-2">{"Role"}</th>
                        <th class="px-4 py-2">{"Sections"}</th>
                        <th class="px-4 py-2"></th>
                    </tr>
                </thead>
                <tbody>
                    { for list.data.results.iter().map(|user| html! {
                        <tr key={user.id} class="border-t align-top">
                            <td class="px-4 py-2">
                                <div class="font-medium">{user.display_name()}</div>
                                <div class="text-xs text-gray-500">{&user.username}</div>
                            </td>
                            <td class="px-4 py-2">{&user.email}</td>
                            <td class="px-4 py-2">
                                if is_admin {
                                    <select class="border rounded px-1" disabled={update.0.loading()} onchange={on_row_role(user)}>
                                        { for ROLES.iter().map(|r| html! {
                                            <option value={r.as_str()} selected={user.role == *r}>{r.as_str()}</option>
                                        }) }
                                    </select>
                                } else {
                                    {user.role.as_str()}
                                }
                            </td>
                            <td class="px-4 py-2">
                                if user.role == Role::Technician {
                                    { for shared.sections.iter().map(|s| html! {
                                        <label class="mr-3 whitespace-nowrap">
                                            <input
                                                type="checkbox"
                                                checked={user.sections.contains(&s.id)}
                                                disabled={!is_admin}
                                                onchange={on_row_section(user, s)}
                                            />
                                            {format!(" {}", s.name)}
                                        </label>
                                    }) }
                                }
                            </td>
                            <td class="px-4 py-2 text-right">
                                if is_admin {
                                    <button class="text-red-600 hover:underline" onclick={on_delete(user)}>{"Delete"}</button>
                                }
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
            <p class="text-sm text-gray-500">{format!("{} users", list.data.count)}</p>
        </div>
    }
}
