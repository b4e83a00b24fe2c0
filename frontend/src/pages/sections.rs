use maintdesk_shared::{Section, SectionInput};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::toast::use_toaster;
use crate::context::use_shared_data;
use crate::hooks::use_manage_sections;

pub fn section_input(name: &str, description: &str) -> SectionInput {
    let description = description.trim();
    SectionInput {
        name: name.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
    }
}

#[function_component(SectionsPage)]
pub fn sections_page() -> Html {
    let shared = use_shared_data();
    let manage = use_manage_sections();
    let toaster = use_toaster();
    let editing = use_state(|| None::<i64>);
    let name = use_state(String::new);
    let description = use_state(String::new);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };
    let on_description = {
        let description = description.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            description.set(input.value());
        })
    };

    let reset = {
        let editing = editing.clone();
        let name = name.clone();
        let description = description.clone();
        Callback::from(move |_| {
            editing.set(None);
            name.set(String::new());
            description.set(String::new());
        })
    };

    let onsubmit = {
        let manage = manage.clone();
        let toaster = toaster.clone();
        let editing = editing.clone();
        let name = name.clone();
        let description = description.clone();
        let reset = reset.clone();
        let refetch = shared.refetch_sections.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let input = section_input(&name, &description);
            if input.name.is_empty() {
                toaster.error("Section name is required");
                return;
            }
            let manage = manage.clone();
            let toaster = toaster.clone();
            let editing = *editing;
            let reset = reset.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                let outcome = match editing {
                    Some(id) => manage.update(id, input).await,
                    None => manage.create(input).await,
                };
                match outcome {
                    Ok(section) => {
                        toaster.success(format!("Saved {}", section.name));
                        reset.emit(());
                        refetch.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to save section", &e),
                }
            });
        })
    };

    let edit = |section: &Section| {
        let editing = editing.clone();
        let name = name.clone();
        let description = description.clone();
        let section = section.clone();
        Callback::from(move |_| {
            editing.set(Some(section.id));
            name.set(section.name.clone());
            description.set(section.description.clone().unwrap_or_default());
        })
    };

    let delete = |section: &Section| {
        let manage = manage.clone();
        let toaster = toaster.clone();
        let refetch = shared.refetch_sections.clone();
        let id = section.id;
        let label = section.name.clone();
        Callback::from(move |_| {
            if !gloo::dialogs::confirm(&format!("Delete section {label}?")) {
                return;
            }
            let manage = manage.clone();
            let toaster = toaster.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                match manage.delete(id).await {
                    Ok(()) => {
                        toaster.success("Section deleted");
                        refetch.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to delete section", &e),
                }
            });
        })
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold text-gray-900">{"Sections"}</h1>

            <form class="bg-white shadow rounded p-4 flex flex-wrap gap-3 items-center" {onsubmit}>
                <input class="border rounded px-2 py-1" placeholder="Name" value={(*name).clone()} oninput={on_name} />
                <input class="border rounded px-2 py-1 flex-1" placeholder="Description" value={(*description).clone()} oninput={on_description} />
                <button type="submit" class="px-4 py-1.5 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={manage.0.loading()}>
                    if editing.is_some() { {"Update"} } else { {"Add section"} }
                </button>
                if editing.is_some() {
                    <button type="button" class="px-3 py-1.5 border rounded text-sm" onclick={reset.reform(|_: MouseEvent| ())}>{"Cancel"}</button>
                }
            </form>

            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for shared.sections.iter().map(|s| html! {
                    <div key={s.id} class="bg-white shadow rounded p-4">
                        <div class="flex items-center justify-between">
                            <h2 class="font-semibold">{&s.name}</h2>
                            <div class="space-x-2 text-sm">
                                <button class="text-blue-600 hover:underline" onclick={edit(s)}>{"Edit"}</button>
                                <button class="text-red-600 hover:underline" onclick={delete(s)}>{"Delete"}</button>
                            </div>
                        </div>
                        <p class="text-sm text-gray-600">{s.description.clone().unwrap_or_default()}</p>
                        <p class="text-xs text-gray-500 mt-2">
                            if s.technicians.is_empty() {
                                {"No technicians"}
                            } else {
                                {format!("Technicians: {}", s.technicians.join(", "))}
                            }
                        </p>
                    </div>
                }) }
            </div>
        </div>
    }
}
