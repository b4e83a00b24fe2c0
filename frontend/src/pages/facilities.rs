use maintdesk_shared::{Facility, FacilityInput, FacilityStatus, FacilityType};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::toast::use_toaster;
use crate::context::use_shared_data;
use crate::hooks::use_manage_facilities;

const TYPES: [FacilityType; 4] = [
    FacilityType::Building,
    FacilityType::Room,
    FacilityType::Equipment,
    FacilityType::Outdoor,
];

const STATUSES: [FacilityStatus; 3] = [
    FacilityStatus::Active,
    FacilityStatus::Inactive,
    FacilityStatus::UnderMaintenance,
];

fn parse_type(value: &str) -> FacilityType {
    TYPES
        .iter()
        .find(|t| t.as_str() == value)
        .cloned()
        .unwrap_or_else(|| FacilityType::Other(value.to_string()))
}

fn parse_status(value: &str) -> FacilityStatus {
    STATUSES
        .iter()
        .copied()
        .find(|s| s.as_str() == value)
        .unwrap_or(FacilityStatus::Active)
}

fn humanize(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityDraft {
    pub name: String,
    pub facility_type: FacilityType,
    pub status: FacilityStatus,
    pub location: String,
}

impl Default for FacilityDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            facility_type: FacilityType::Building,
            status: FacilityStatus::Active,
            location: String::new(),
        }
    }
}

impl From<&Facility> for FacilityDraft {
    fn from(f: &Facility) -> Self {
        Self {
            name: f.name.clone(),
            facility_type: f.facility_type.clone(),
            status: f.status,
            location: f.location.clone().unwrap_or_default(),
        }
    }
}

impl FacilityDraft {
    pub fn to_input(&self) -> FacilityInput {
        let location = self.location.trim();
        FacilityInput {
            name: self.name.trim().to_string(),
            facility_type: self.facility_type.clone(),
            status: self.status,
            location: (!location.is_empty()).then(|| location.to_string()),
        }
    }
}

#[function_component(FacilitiesPage)]
pub fn facilities_page() -> Html {
    let shared = use_shared_data();
    let manage = use_manage_facilities();
    let toaster = use_toaster();
    // `None` while creating, the facility id while editing.
    let editing = use_state(|| None::<i64>);
    let draft = use_state(FacilityDraft::default);

    let on_name = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(FacilityDraft { name: input.value(), ..(*draft).clone() });
        })
    };
    let on_location = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(FacilityDraft { location: input.value(), ..(*draft).clone() });
        })
    };
    let on_type = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.set(FacilityDraft { facility_type: parse_type(&select.value()), ..(*draft).clone() });
        })
    };
    let on_status = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.set(FacilityDraft { status: parse_status(&select.value()), ..(*draft).clone() });
        })
    };

    let reset = {
        let editing = editing.clone();
        let draft = draft.clone();
        Callback::from(move |_| {
            editing.set(None);
            draft.set(FacilityDraft::default());
        })
    };

    let onsubmit = {
        let manage = manage.clone();
        let toaster = toaster.clone();
        let editing = editing.clone();
        let draft = draft.clone();
        let refetch = shared.refetch_facilities.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let input = draft.to_input();
            if input.name.is_empty() {
                toaster.error("Facility name is required");
                return;
            }
            let manage = manage.clone();
            let toaster = toaster.clone();
            let editing = editing.clone();
            let draft = draft.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                let outcome = match *editing {
                    Some(id) => manage.update(id, input).await,
                    None => manage.create(input).await,
                };
                match outcome {
                    Ok(facility) => {
                        toaster.success(format!("Saved {}", facility.name));
                        editing.set(None);
                        draft.set(FacilityDraft::default());
                        refetch.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to save facility", &e),
                }
            });
        })
    };

    let edit = |facility: &Facility| {
        let editing = editing.clone();
        let draft = draft.clone();
        let id = facility.id;
        let values = FacilityDraft::from(facility);
        Callback::from(move |_| {
            editing.set(Some(id));
            draft.set(values.clone());
        })
    };

    let delete = |facility: &Facility| {
        let manage = manage.clone();
        let toaster = toaster.clone();
        let refetch = shared.refetch_facilities.clone();
        let id = facility.id;
        let name = facility.name.clone();
        Callback::from(move |_| {
            if !gloo::dialogs::confirm(&format!("Delete {name}?")) {
                return;
            }
            let manage = manage.clone();
            let toaster = toaster.clone();
            let refetch = refetch.clone();
            spawn_local(async move {
                match manage.delete(id).await {
                    Ok(()) => {
                        toaster.success("Facility deleted");
                        refetch.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to delete facility", &e),
                }
            });
        })
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold text-gray-900">{"Facilities"}</h1>

            <form class="bg-white shadow rounded p-4 grid grid-cols-1 md:grid-cols-5 gap-3 items-end" {onsubmit}>
                <input class="border rounded px-2 py-1" placeholder="Name" value={draft.name.clone()} oninput={on_name} />
                <select class="border rounded px-2 py-1" onchange={on_type}>
                    { for TYPES.iter().map(|t| html! {
                        <option value={t.as_str().to_string()} selected={draft.facility_type == *t}>{humanize(t.as_str())}</option>
                    }) }
                </select>
                <select class="border rounded px-2 py-1" onchange={on_status}>
                    { for STATUSES.iter().map(|s| html! {
                        <option value={s.as_str()} selected={draft.status == *s}>{humanize(s.as_str())}</option>
                    }) }
                </select>
                <input class="border rounded px-2 py-1" placeholder="Location" value={draft.location.clone()} oninput={on_location} />
                <div class="space-x-2">
                    <button type="submit" class="px-4 py-1.5 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={manage.0.loading()}>
                        if editing.is_some() { {"Update"} } else { {"Add facility"} }
                    </button>
                    if editing.is_some() {
                        <button type="button" class="px-3 py-1.5 border rounded text-sm" onclick={reset}>{"Cancel"}</button>
                    }
                </div>
            </form>

            <table class="min-w-full bg-white shadow rounded text-sm">
                <thead class="bg-gray-50 text-left text-gray-500">
                    <tr>
                        <th class="px-4 py-2">{"Name"}</th>
                        <th class="px-4 py-2">{"Type"}</th>
                        <th class="px-4 py-2">{"Status"}</th>
                        <th class="px-4 py-2">{"Location"}</th>
                        <th class="px-4 py-2"></th>
                    </tr>
                </thead>
                <tbody>
                    { for shared.facilities.iter().map(|f| html! {
                        <tr key={f.id} class="border-t">
                            <td class="px-4 py-2">{&f.name}</td>
                            <td class="px-4 py-2">{humanize(f.facility_type.as_str())}</td>
                            <td class="px-4 py-2">{humanize(f.status.as_str())}</td>
                            <td class="px-4 py-2">{f.location.clone().unwrap_or_default()}</td>
                            <td class="px-4 py-2 space-x-2 text-right">
                                <button class="text-blue-600 hover:underline" onclick={edit(f)}>{"Edit"}</button>
                                <button class="text-red-600 hover:underline" onclick={delete(f)}>{"Delete"}</button>
                            </td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}
