use maintdesk_shared::session::Session;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::auth::{use_auth, LoginForm, RegisterForm};
use crate::components::layout::{home_route, Route};

fn sign_in(navigator: Option<Navigator>, login: Callback<Session>) -> Callback<Session> {
    Callback::from(move |session: Session| {
        let target = home_route(session.user.role);
        login.emit(session);
        if let Some(navigator) = &navigator {
            navigator.push(&target);
        }
    })
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let auth = use_auth();
    let navigator = use_navigator();

    if let Some(user) = auth.user() {
        return html! { <Redirect<Route> to={home_route(user.role)} /> };
    }

    html! {
        <div>
            <LoginForm on_login={sign_in(navigator, auth.login.clone())} />
            <p class="text-center text-sm text-gray-600 -mt-8">
                {"No account yet? "}
                <Link<Route> to={Route::Register} classes="text-blue-600 hover:underline">{"Register"}</Link<Route>>
            </p>
        </div>
    }
}

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let auth = use_auth();
    let navigator = use_navigator();

    if let Some(user) = auth.user() {
        return html! { <Redirect<Route> to={home_route(user.role)} /> };
    }

    html! {
        <RegisterForm on_register={sign_in(navigator, auth.login.clone())} />
    }
}
