//! Transient notifications.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use maintdesk_shared::ApiError;
use yew::prelude::*;

const DISMISS_AFTER_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn classes(&self) -> &'static str {
        match self {
            Self::Success => "bg-green-600 text-white",
            Self::Error => "bg-red-600 text-white",
            Self::Info => "bg-gray-800 text-white",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// The generic message first, then one message per field for validation
/// failures.
pub fn error_messages(generic: &str, error: &ApiError) -> Vec<String> {
    let mut messages = vec![generic.to_string()];
    match error {
        ApiError::Validation(_) => messages.extend(error.field_messages()),
        other => messages.push(other.to_string()),
    }
    messages.dedup();
    messages
}

#[derive(Default, PartialEq)]
struct ToastList {
    next_id: u32,
    toasts: Vec<Toast>,
}

enum ToastAction {
    Push(ToastKind, String),
    Dismiss(u32),
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        let mut next_id = self.next_id;
        match action {
            ToastAction::Push(kind, message) => {
                toasts.push(Toast { id: next_id, kind, message });
                next_id = next_id.wrapping_add(1);
            }
            ToastAction::Dismiss(id) => toasts.retain(|t| t.id != id),
        }
        Rc::new(Self { next_id, toasts })
    }
}

#[derive(Clone, PartialEq)]
pub struct Toaster {
    list: UseReducerHandle<ToastList>,
}

impl Toaster {
    fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.list.next_id;
        self.list.dispatch(ToastAction::Push(kind, message.into()));
        let list = self.list.clone();
        Timeout::new(DISMISS_AFTER_MS, move || list.dispatch(ToastAction::Dismiss(id))).forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    /// One toast for `generic`, plus one per field message of `error`.
    pub fn api_error(&self, generic: &str, error: &ApiError) {
        for message in error_messages(generic, error) {
            self.error(message);
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let list = use_reducer(ToastList::default);
    let toaster = Toaster { list: list.clone() };

    html! {
        <ContextProvider<Toaster> context={toaster}>
            {props.children.clone()}
            <div class="fixed bottom-4 right-4 space-y-2 z-50">
                { for list.toasts.iter().map(|toast| {
                    let list = list.clone();
                    let id = toast.id;
                    let dismiss = Callback::from(move |_| list.dispatch(ToastAction::Dismiss(id)));
                    html! {
                        <div key={toast.id} class={classes!("px-4", "py-2", "rounded", "shadow-lg", "flex", "items-center", "space-x-3", toast.kind.classes())}>
                            <span class="text-sm">{&toast.message}</span>
                            <button class="text-xs opacity-75 hover:opacity-100" onclick={dismiss}>{"x"}</button>
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<Toaster>>
    }
}

#[hook]
pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().expect("Toaster not found")
}
