use gloo::console;
use maintdesk_shared::session::Session;
use maintdesk_shared::{Actor, AuthResponse, RegisterRequest, User};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::auth;

const INPUT_CLASS: &str = "appearance-none relative block w-full px-3 py-2 border border-gray-300 placeholder-gray-500 text-gray-900 rounded-md focus:outline-none focus:ring-blue-500 focus:border-blue-500 sm:text-sm";

fn text_setter(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

fn session_of(response: AuthResponse) -> Session {
    Session {
        token: response.token,
        refresh_token: response.refresh_token,
        user: response.user,
    }
}

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub on_login: Callback<Session>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error_message = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let error_message = error_message.clone();
        let loading = loading.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if username.trim().is_empty() || password.is_empty() {
                error_message.set(Some("Please enter your username and password".to_string()));
                return;
            }

            loading.set(true);
            error_message.set(None);

            let username = (*username).clone();
            let password = (*password).clone();
            let error_message = error_message.clone();
            let loading = loading.clone();
            let on_login = on_login.clone();
            spawn_local(async move {
                match auth::login(&username, &password).await {
                    Ok(response) => {
                        loading.set(false);
                        on_login.emit(session_of(response));
                    }
                    Err(e) => {
                        loading.set(false);
                        error_message.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-extrabold text-gray-900">
                        {"Sign in to MaintDesk"}
                    </h2>
                    <p class="mt-2 text-center text-sm text-gray-600">
                        {"Facility maintenance help desk"}
                    </p>
                </div>

                <form class="mt-8 space-y-4" {onsubmit}>
                    <div>
                        <label for="username" class="sr-only">{"Username"}</label>
                        <input
                            id="username"
                            name="username"
                            type="text"
                            autocomplete="username"
                            class={INPUT_CLASS}
                            placeholder="Username"
                            value={(*username).clone()}
                            oninput={text_setter(&username)}
                        />
                    </div>
                    <div>
                        <label for="password" class="sr-only">{"Password"}</label>
                        <input
                            id="password"
                            name="password"
                            type="password"
                            autocomplete="current-password"
                            class={INPUT_CLASS}
                            placeholder="Password"
                            value={(*password).clone()}
                            oninput={text_setter(&password)}
                        />
                    </div>

                    if let Some(error) = (*error_message).clone() {
                        <div class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded">
                            {error}
                        </div>
                    }

                    <button
                        type="submit"
                        disabled={*loading}
                        class="w-full flex justify-center py-2 px-4 border border-transparent text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed"
                    >
                        if *loading { {"Signing in..."} } else { {"Sign in"} }
                    </button>
                </form>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct RegisterFormProps {
    pub on_register: Callback<Session>,
}

#[function_component(RegisterForm)]
pub fn register_form(props: &RegisterFormProps) -> Html {
    let username = use_state(String::new);
    let email = use_state(String::new);
    let first_name = use_state(String::new);
    let last_name = use_state(String::new);
    let password = use_state(String::new);
    let errors = use_state(Vec::<String>::new);
    let loading = use_state(|| false);

    let onsubmit = {
        let username = username.clone();
        let email = email.clone();
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let password = password.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        let on_register = props.on_register.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let request = RegisterRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
                email: email.trim().to_string(),
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
            };
            if request.username.is_empty() || request.password.is_empty() || request.email.is_empty() {
                errors.set(vec!["Username, email and password are required".to_string()]);
                return;
            }

            loading.set(true);
            errors.set(Vec::new());
            let errors = errors.clone();
            let loading = loading.clone();
            let on_register = on_register.clone();
            spawn_local(async move {
                let outcome = auth::register(&request).await;
                loading.set(false);
                match outcome {
                    Ok(response) => on_register.emit(session_of(response)),
                    Err(e) => errors.set(e.field_messages()),
                }
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 py-12 px-4">
            <div class="max-w-md w-full space-y-6">
                <h2 class="text-center text-3xl font-extrabold text-gray-900">{"Create an account"}</h2>
                <form class="space-y-3" {onsubmit}>
                    <input class={INPUT_CLASS} placeholder="Username" value={(*username).clone()} oninput={text_setter(&username)} />
                    <input class={INPUT_CLASS} type="email" placeholder="Email" value={(*email).clone()} oninput={text_setter(&email)} />
                    <div class="flex space-x-2">
                        <input class={INPUT_CLASS} placeholder="First name" value={(*first_name).clone()} oninput={text_setter(&first_name)} />
                        <input class={INPUT_CLASS} placeholder="Last name" value={(*last_name).clone()} oninput={text_setter(&last_name)} />
                    </div>
                    <input class={INPUT_CLASS} type="password" placeholder="Password" value={(*password).clone()} oninput={text_setter(&password)} />

                    if !errors.is_empty() {
                        <ul class="bg-red-50 border border-red-200 text-red-700 px-4 py-3 rounded text-sm">
                            { for errors.iter().map(|e| html! { <li>{e}</li> }) }
                        </ul>
                    }

                    <button
                        type="submit"
                        disabled={*loading}
                        class="w-full py-2 px-4 text-sm font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 disabled:opacity-50"
                    >
                        if *loading { {"Creating account..."} } else { {"Register"} }
                    </button>
                </form>
            </div>
        </div>
    }
}

// Auth context for sharing the signed-in user across the app
#[derive(Clone, Debug, PartialEq)]
pub struct AuthContext {
    pub session: Option<Session>,
    pub login: Callback<Session>,
    pub logout: Callback<()>,
}

impl AuthContext {
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn actor(&self) -> Option<Actor> {
        self.user().map(Actor::from)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self {
            session: None,
            login: Callback::noop(),
            logout: Callback::noop(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    pub children: Children,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let session = use_state(auth::current_session);

    // Roles and names can change server-side between visits.
    {
        let session = session.clone();
        use_effect_with((), move |_| {
            if let Some(stored) = (*session).clone() {
                spawn_local(async move {
                    match auth::profile().await {
                        Ok(user) => session.set(Some(Session { user, ..stored })),
                        Err(e) if e.is_unauthorized() => session.set(None),
                        Err(e) => console::warn!(format!("Profile refresh failed: {e}")),
                    }
                });
            }
            || ()
        });
    }

    let login = {
        let session = session.clone();
        Callback::from(move |current: Session| session.set(Some(current)))
    };

    let logout = {
        let session = session.clone();
        Callback::from(move |_| {
            let session = session.clone();
            spawn_local(async move {
                auth::logout().await;
                session.set(None);
            });
        })
    };

    let context = AuthContext {
        session: (*session).clone(),
        login,
        logout,
    };

    html! {
        <ContextProvider<AuthContext> {context}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

/// Panics outside an [`AuthProvider`].
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext not found")
}
