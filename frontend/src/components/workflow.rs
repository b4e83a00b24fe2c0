//! Role-specific ticket detail panels.
//!
//! Every status change goes through [`tickets::transition`], so the panels
//! only decide what to offer; the workflow rules themselves live in the
//! shared crate. A successful save shows a toast and drops back to the
//! read-only view. A failed one keeps the form values.

use maintdesk_shared::workflow::{self, can_edit_details, next_allowed_statuses, user_actions};
use maintdesk_shared::{Actor, Facility, Role, Section, Ticket, TicketStatus, TicketUpdate, User};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::auth::use_auth;
use super::tickets::{format_timestamp, StatusBadge};
use super::toast::{use_toaster, Toaster};
use crate::hooks::use_ticket_comments;
use crate::services::tickets;

const CLOSE_PROMPT: &str = "Close this ticket? A closed ticket cannot be reopened.";

/// Combine an assignment pick and a status pick into one PATCH.
pub fn admin_update(
    ticket: &Ticket,
    technician: Option<i64>,
    status: Option<TicketStatus>,
) -> TicketUpdate {
    let mut update = technician
        .map(|id| workflow::assignment_update(ticket, id))
        .unwrap_or_default();
    if let Some(status) = status {
        update.status = Some(status);
    }
    update
}

/// Statuses the admin panel offers. `assigned` is only listed when a
/// technician is already on the ticket or picked in the same form.
pub fn admin_status_options(
    ticket: &Ticket,
    role: Role,
    technician: Option<i64>,
) -> Vec<TicketStatus> {
    let has_assignee = technician.is_some() || ticket.assigned_to.is_some();
    next_allowed_statuses(ticket.status, role)
        .into_iter()
        .filter(|to| *to != TicketStatus::Assigned || has_assignee)
        .collect()
}

pub fn technician_action_label(from: TicketStatus, to: TicketStatus) -> &'static str {
    match (from, to) {
        (TicketStatus::Pending, TicketStatus::InProgress) => "Resume work",
        (_, TicketStatus::InProgress) => "Start work",
        (_, TicketStatus::Pending) => "Put on hold",
        (_, TicketStatus::Resolved) => "Mark resolved",
        (_, other) => other.label(),
    }
}

/// Editable copy of a ticket's details.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsDraft {
    pub title: String,
    pub description: String,
    pub section_id: Option<i64>,
    pub facility_id: Option<i64>,
}

fn section_id_of(ticket: &Ticket, sections: &[Section]) -> Option<i64> {
    let name = ticket.section.as_deref()?;
    sections.iter().find(|s| s.name == name).map(|s| s.id)
}

fn facility_id_of(ticket: &Ticket, facilities: &[Facility]) -> Option<i64> {
    let name = ticket.facility.as_deref()?;
    facilities.iter().find(|f| f.name == name).map(|f| f.id)
}

impl DetailsDraft {
    pub fn from_ticket(ticket: &Ticket, sections: &[Section], facilities: &[Facility]) -> Self {
        Self {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            section_id: section_id_of(ticket, sections),
            facility_id: facility_id_of(ticket, facilities),
        }
    }

    /// Only the fields that differ from `ticket`.
    pub fn changes(
        &self,
        ticket: &Ticket,
        sections: &[Section],
        facilities: &[Facility],
    ) -> TicketUpdate {
        let title = self.title.trim();
        let description = self.description.trim();
        TicketUpdate {
            title: (title != ticket.title).then(|| title.to_string()),
            description: (description != ticket.description).then(|| description.to_string()),
            section_id: self
                .section_id
                .filter(|id| Some(*id) != section_id_of(ticket, sections)),
            facility_id: self
                .facility_id
                .filter(|id| Some(*id) != facility_id_of(ticket, facilities)),
            ..TicketUpdate::default()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn submit_transition(
    ticket: Ticket,
    actor: Actor,
    update: TicketUpdate,
    confirmed: bool,
    toaster: Toaster,
    success: &'static str,
    on_done: Callback<()>,
    saving: UseStateHandle<bool>,
) {
    saving.set(true);
    spawn_local(async move {
        let outcome = tickets::transition(&ticket, &actor, update, confirmed).await;
        saving.set(false);
        match outcome {
            Ok(_) => {
                toaster.success(success);
                on_done.emit(());
            }
            Err(e) => toaster.api_error("Failed to update ticket", &e),
        }
    });
}

fn closing_confirmed(update: &TicketUpdate, ticket: &Ticket) -> Option<bool> {
    match update.status {
        Some(to) if workflow::requires_confirmation(ticket.status, to) => {
            Some(gloo::dialogs::confirm(CLOSE_PROMPT))
        }
        _ => None,
    }
}

// ============================================
// READ-ONLY SUMMARY
// ============================================

#[derive(Properties, PartialEq)]
pub struct TicketSummaryProps {
    pub ticket: Ticket,
}

#[function_component(TicketSummary)]
pub fn ticket_summary(props: &TicketSummaryProps) -> Html {
    let ticket = &props.ticket;
    let row = |label: &'static str, value: String| {
        html! {
            <div class="py-1 flex">
                <dt class="w-40 text-sm text-gray-500">{label}</dt>
                <dd class="text-sm text-gray-900">{value}</dd>
            </div>
        }
    };

    html! {
        <div class="bg-white shadow rounded p-4 space-y-3">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">
                    <span class="font-mono text-gray-500 mr-2">{&ticket.ticket_no}</span>
                    {&ticket.title}
                </h2>
                <StatusBadge status={ticket.status} />
            </div>
            <p class="text-gray-700 whitespace-pre-line">{&ticket.description}</p>
            <dl>
                {row("Section", ticket.section.clone().unwrap_or_default())}
                {row("Facility", ticket.facility.clone().unwrap_or_default())}
                {row("Raised by", ticket.raised_by.clone())}
                {row("Assigned to", ticket.assigned_to.as_ref().map(|u| u.display_name()).unwrap_or_else(|| "Unassigned".to_string()))}
                {row("Created", format_timestamp(&ticket.created_at))}
                if let Some(at) = ticket.resolved_at.as_ref() {
                    {row("Resolved", format_timestamp(at))}
                }
                if let Some(reason) = ticket.pending_reason.clone() {
                    {row("On hold because", reason)}
                }
            </dl>
            if let Some(feedback) = ticket.feedback.as_ref() {
                <div class="border-t pt-3 text-sm">
                    <span class="font-medium">{format!("Rated {}/5 by {}", feedback.rating, feedback.rated_by)}</span>
                    if let Some(comment) = feedback.comment.clone() {
                        <p class="text-gray-600 mt-1">{comment}</p>
                    }
                </div>
            }
        </div>
    }
}

// ============================================
// DETAILS EDITOR
// ============================================

#[derive(Properties, PartialEq)]
pub struct DetailsEditorProps {
    pub ticket: Ticket,
    pub sections: Vec<Section>,
    pub facilities: Vec<Facility>,
    pub on_saved: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Title, description, section and facility form. Only changed fields are
/// sent.
#[function_component(DetailsEditor)]
pub fn details_editor(props: &DetailsEditorProps) -> Html {
    let auth = use_auth();
    let toaster = use_toaster();
    let draft = use_state(|| DetailsDraft::from_ticket(&props.ticket, &props.sections, &props.facilities));
    let saving = use_state(|| false);

    let Some(actor) = auth.actor() else {
        return html! {};
    };

    let on_title = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(DetailsDraft { title: input.value(), ..(*draft).clone() });
        })
    };
    let on_description = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            draft.set(DetailsDraft { description: area.value(), ..(*draft).clone() });
        })
    };
    let on_section = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.set(DetailsDraft { section_id: select.value().parse().ok(), ..(*draft).clone() });
        })
    };
    let on_facility = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            draft.set(DetailsDraft { facility_id: select.value().parse().ok(), ..(*draft).clone() });
        })
    };

    let on_save = {
        let ticket = props.ticket.clone();
        let draft = draft.clone();
        let sections = props.sections.clone();
        let facilities = props.facilities.clone();
        let toaster = toaster.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
                toaster.error("Title and description are required");
                return;
            }
            let update = draft.changes(&ticket, &sections, &facilities);
            submit_transition(
                ticket.clone(),
                actor.clone(),
                update,
                false,
                toaster.clone(),
                "Ticket updated",
                on_saved.clone(),
                saving.clone(),
            );
        })
    };
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());

    html! {
        <form class="bg-white shadow rounded p-4 space-y-3" onsubmit={on_save}>
            <input class="block w-full border rounded px-2 py-1" value={draft.title.clone()} oninput={on_title} />
            <textarea class="block w-full border rounded px-2 py-1" rows="4" value={draft.description.clone()} oninput={on_description} />
            <select class="block w-full border rounded px-2 py-1" onchange={on_section}>
                { for props.sections.iter().map(|s| html! {
                    <option value={s.id.to_string()} selected={draft.section_id == Some(s.id)}>{&s.name}</option>
                }) }
            </select>
            <select class="block w-full border rounded px-2 py-1" onchange={on_facility}>
                { for props.facilities.iter().map(|f| html! {
                    <option value={f.id.to_string()} selected={draft.facility_id == Some(f.id)}>{&f.name}</option>
                }) }
            </select>
            <div class="space-x-2">
                <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving}>
                    {"Save changes"}
                </button>
                <button type="button" class="px-4 py-2 border rounded text-sm" onclick={on_cancel}>{"Cancel"}</button>
            </div>
        </form>
    }
}

// ============================================
// ADMIN / MANAGER
// ============================================

#[derive(Properties, PartialEq)]
pub struct AdminTicketDetailProps {
    pub ticket: Ticket,
    pub technicians: Vec<User>,
    pub sections: Vec<Section>,
    pub facilities: Vec<Facility>,
    pub on_changed: Callback<()>,
}

#[function_component(AdminTicketDetail)]
pub fn admin_ticket_detail(props: &AdminTicketDetailProps) -> Html {
    let auth = use_auth();
    let toaster = use_toaster();
    let editing = use_state(|| false);
    let editing_details = use_state(|| false);
    let technician = use_state(|| None::<i64>);
    let status = use_state(|| None::<TicketStatus>);
    let saving = use_state(|| false);

    let Some(actor) = auth.actor() else {
        return html! {};
    };
    let ticket = props.ticket.clone();
    let allowed = admin_status_options(&ticket, actor.role, *technician);
    let details_editable = can_edit_details(&ticket, &actor);

    let start_details = {
        let editing_details = editing_details.clone();
        Callback::from(move |_| editing_details.set(true))
    };
    let cancel_details = {
        let editing_details = editing_details.clone();
        Callback::from(move |_| editing_details.set(false))
    };
    let details_saved = {
        let editing_details = editing_details.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            editing_details.set(false);
            on_changed.emit(());
        })
    };

    let start_edit = {
        let editing = editing.clone();
        let technician = technician.clone();
        let status = status.clone();
        let current = ticket.assigned_to.as_ref().map(|u| u.id);
        Callback::from(move |_| {
            technician.set(current);
            status.set(None);
            editing.set(true);
        })
    };
    let cancel_edit = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(false))
    };

    let on_technician = {
        let technician = technician.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            technician.set(select.value().parse().ok());
        })
    };
    let on_status = {
        let status = status.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            status.set(select.value().parse().ok());
        })
    };

    let on_save = {
        let ticket = ticket.clone();
        let actor = actor.clone();
        let technician = technician.clone();
        let status = status.clone();
        let toaster = toaster.clone();
        let editing = editing.clone();
        let saving = saving.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            let current = ticket.assigned_to.as_ref().map(|u| u.id);
            let pick = (*technician).filter(|id| Some(*id) != current);
            let update = admin_update(&ticket, pick, *status);
            let confirmed = match closing_confirmed(&update, &ticket) {
                Some(false) => return,
                Some(true) => true,
                None => false,
            };
            let editing = editing.clone();
            let on_changed = on_changed.clone();
            let on_done = Callback::from(move |_| {
                editing.set(false);
                on_changed.emit(());
            });
            submit_transition(
                ticket.clone(),
                actor.clone(),
                update,
                confirmed,
                toaster.clone(),
                "Ticket updated",
                on_done,
                saving.clone(),
            );
        })
    };

    html! {
        <div class="space-y-4">
            if *editing_details {
                <DetailsEditor
                    ticket={ticket.clone()}
                    sections={props.sections.clone()}
                    facilities={props.facilities.clone()}
                    on_saved={details_saved}
                    on_cancel={cancel_details}
                />
            } else {
                <TicketSummary ticket={ticket.clone()} />
            }
            <div class="bg-white shadow rounded p-4">
                if !*editing {
                    if ticket.status.is_terminal() {
                        <p class="text-sm text-gray-500">{"This ticket is closed."}</p>
                    } else {
                        <div class="space-x-2">
                            <button class="px-4 py-2 bg-blue-600 text-white rounded text-sm" onclick={start_edit}>
                                {"Manage ticket"}
                            </button>
                            if details_editable && !*editing_details {
                                <button class="px-4 py-2 border rounded text-sm" onclick={start_details}>
                                    {"Edit details"}
                                </button>
                            }
                        </div>
                    }
                } else {
                    <div class="space-y-3">
                        <label class="block text-sm">
                            <span class="text-gray-700">{"Technician"}</span>
                            <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_technician}>
                                <option value="" selected={technician.is_none()}>{"Unassigned"}</option>
                                { for props.technicians.iter().map(|t| html! {
                                    <option value={t.id.to_string()} selected={*technician == Some(t.id)}>
                                        {t.display_name()}
                                    </option>
                                }) }
                            </select>
                        </label>
                        <label class="block text-sm">
                            <span class="text-gray-700">{"Status"}</span>
                            <select class="mt-1 block w-full border rounded px-2 py-1" onchange={on_status}>
                                <option value="" selected={status.is_none()}>
                                    {format!("Keep {}", ticket.status.label())}
                                </option>
                                { for allowed.iter().map(|s| html! {
                                    <option value={s.as_str()} selected={*status == Some(*s)}>{s.label()}</option>
                                }) }
                            </select>
                        </label>
                        <div class="space-x-2">
                            <button class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving} onclick={on_save}>
                                if *saving { {"Saving..."} } else { {"Save"} }
                            </button>
                            <button class="px-4 py-2 border rounded text-sm" onclick={cancel_edit}>{"Cancel"}</button>
                        </div>
                    </div>
                }
            </div>
        </div>
    }
}

// ============================================
// TECHNICIAN
// ============================================

#[derive(Properties, PartialEq)]
pub struct TechnicianStatusPanelProps {
    pub ticket: Ticket,
    pub on_changed: Callback<()>,
}

#[function_component(TechnicianStatusPanel)]
pub fn technician_status_panel(props: &TechnicianStatusPanelProps) -> Html {
    let auth = use_auth();
    let toaster = use_toaster();
    let reason = use_state(String::new);
    let saving = use_state(|| false);

    let Some(actor) = auth.actor() else {
        return html! {};
    };
    let ticket = props.ticket.clone();

    if !ticket.is_assigned_to(actor.id) {
        return html! {
            <div class="space-y-4">
                <TicketSummary ticket={ticket} />
                <p class="text-sm text-gray-500">{"This ticket is not assigned to you."}</p>
            </div>
        };
    }

    let allowed = next_allowed_statuses(ticket.status, Role::Technician);
    let on_reason = {
        let reason = reason.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            reason.set(area.value());
        })
    };

    let action = |to: TicketStatus| {
        let ticket = ticket.clone();
        let actor = actor.clone();
        let toaster = toaster.clone();
        let reason = reason.clone();
        let saving = saving.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            let update = TicketUpdate {
                status: Some(to),
                pending_reason: (to == TicketStatus::Pending).then(|| (*reason).clone()),
                ..TicketUpdate::default()
            };
            let reason = reason.clone();
            let on_changed = on_changed.clone();
            let on_done = Callback::from(move |_| {
                reason.set(String::new());
                on_changed.emit(());
            });
            submit_transition(
                ticket.clone(),
                actor.clone(),
                update,
                false,
                toaster.clone(),
                "Status updated",
                on_done,
                saving.clone(),
            );
        })
    };

    html! {
        <div class="space-y-4">
            <TicketSummary ticket={ticket.clone()} />
            <div class="bg-white shadow rounded p-4 space-y-3">
                if allowed.contains(&TicketStatus::Pending) {
                    <textarea
                        class="block w-full border rounded px-2 py-1 text-sm"
                        placeholder="Reason for putting the ticket on hold"
                        value={(*reason).clone()}
                        oninput={on_reason}
                    />
                }
                if allowed.is_empty() {
                    <p class="text-sm text-gray-500">{"No further action is needed from you."}</p>
                }
                <div class="space-x-2">
                    { for allowed.iter().map(|to| html! {
                        <button
                            class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50"
                            disabled={*saving}
                            onclick={action(*to)}
                        >
                            {technician_action_label(ticket.status, *to)}
                        </button>
                    }) }
                </div>
            </div>
        </div>
    }
}

// ============================================
// END USER
// ============================================

#[derive(Properties, PartialEq)]
pub struct UserTicketDetailProps {
    pub ticket: Ticket,
    pub sections: Vec<Section>,
    pub facilities: Vec<Facility>,
    pub on_changed: Callback<()>,
}

#[function_component(UserTicketDetail)]
pub fn user_ticket_detail(props: &UserTicketDetailProps) -> Html {
    let auth = use_auth();
    let toaster = use_toaster();
    let editing = use_state(|| false);
    let saving = use_state(|| false);

    let Some(actor) = auth.actor() else {
        return html! {};
    };
    let ticket = props.ticket.clone();
    let actions = user_actions(&ticket, &actor);

    let start_edit = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(true))
    };
    let cancel_edit = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(false))
    };
    let saved = {
        let editing = editing.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            editing.set(false);
            on_changed.emit(());
        })
    };

    let close_with = |success: &'static str| {
        let ticket = ticket.clone();
        let actor = actor.clone();
        let toaster = toaster.clone();
        let saving = saving.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |_| {
            if !gloo::dialogs::confirm(CLOSE_PROMPT) {
                return;
            }
            submit_transition(
                ticket.clone(),
                actor.clone(),
                TicketUpdate::default().with_status(TicketStatus::Closed),
                true,
                toaster.clone(),
                success,
                on_changed.clone(),
                saving.clone(),
            );
        })
    };

    html! {
        <div class="space-y-4">
            if *editing {
                <DetailsEditor
                    ticket={ticket.clone()}
                    sections={props.sections.clone()}
                    facilities={props.facilities.clone()}
                    on_saved={saved}
                    on_cancel={cancel_edit}
                />
            } else {
                <TicketSummary ticket={ticket.clone()} />
            }

            <div class="flex space-x-2">
                if actions.can_edit && !*editing {
                    <button class="px-4 py-2 border rounded text-sm" onclick={start_edit}>{"Edit details"}</button>
                }
                if actions.can_cancel {
                    <button class="px-4 py-2 bg-red-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving} onclick={close_with("Ticket cancelled")}>
                        {"Cancel ticket"}
                    </button>
                }
                if actions.can_confirm_closure {
                    <button class="px-4 py-2 bg-green-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving} onclick={close_with("Ticket closed")}>
                        {"Confirm closure"}
                    </button>
                }
            </div>

            if actions.can_rate {
                <FeedbackForm ticket_id={ticket.id} on_submitted={props.on_changed.clone()} />
            }
        </div>
    }
}

// ============================================
// FEEDBACK AND COMMENTS
// ============================================

#[derive(Properties, PartialEq)]
pub struct FeedbackFormProps {
    pub ticket_id: i64,
    pub on_submitted: Callback<()>,
}

#[function_component(FeedbackForm)]
pub fn feedback_form(props: &FeedbackFormProps) -> Html {
    let toaster = use_toaster();
    let rating = use_state(|| 0_i64);
    let comment = use_state(String::new);
    let saving = use_state(|| false);

    let on_rating = {
        let rating = rating.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            rating.set(select.value().parse().unwrap_or(0));
        })
    };
    let on_comment = {
        let comment = comment.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            comment.set(area.value());
        })
    };

    let onsubmit = {
        let ticket_id = props.ticket_id;
        let rating = rating.clone();
        let comment = comment.clone();
        let saving = saving.clone();
        let toaster = toaster.clone();
        let on_submitted = props.on_submitted.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let rating = *rating;
            let comment = (*comment).clone();
            let saving = saving.clone();
            let toaster = toaster.clone();
            let on_submitted = on_submitted.clone();
            saving.set(true);
            spawn_local(async move {
                let outcome = tickets::add_feedback(ticket_id, rating, &comment).await;
                saving.set(false);
                match outcome {
                    Ok(_) => {
                        toaster.success("Thank you for your feedback");
                        on_submitted.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to submit feedback", &e),
                }
            });
        })
    };

    html! {
        <form class="bg-white shadow rounded p-4 space-y-3" {onsubmit}>
            <h3 class="font-medium">{"How did we do?"}</h3>
            <select class="block border rounded px-2 py-1" onchange={on_rating}>
                <option value="0" selected={*rating == 0}>{"Choose a rating"}</option>
                { for (1..=5).map(|n: i64| html! {
                    <option value={n.to_string()} selected={*rating == n}>{format!("{n} / 5")}</option>
                }) }
            </select>
            <textarea
                class="block w-full border rounded px-2 py-1 text-sm"
                placeholder="Anything you would like to add? (optional)"
                value={(*comment).clone()}
                oninput={on_comment}
            />
            <button type="submit" class="px-4 py-2 bg-blue-600 text-white rounded text-sm disabled:opacity-50" disabled={*saving}>
                {"Submit feedback"}
            </button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct CommentThreadProps {
    pub ticket_id: i64,
}

#[function_component(CommentThread)]
pub fn comment_thread(props: &CommentThreadProps) -> Html {
    let comments = use_ticket_comments(props.ticket_id);
    let toaster = use_toaster();
    let text = use_state(String::new);
    let saving = use_state(|| false);

    let on_text = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let area: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(area.value());
        })
    };

    let onsubmit = {
        let ticket_id = props.ticket_id;
        let text = text.clone();
        let saving = saving.clone();
        let toaster = toaster.clone();
        let refetch = comments.refetch.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if text.trim().is_empty() {
                toaster.error("Comment cannot be empty");
                return;
            }
            let body = (*text).clone();
            let text = text.clone();
            let saving = saving.clone();
            let toaster = toaster.clone();
            let refetch = refetch.clone();
            saving.set(true);
            spawn_local(async move {
                let outcome = tickets::add_comment(ticket_id, &body).await;
                saving.set(false);
                match outcome {
                    Ok(_) => {
                        text.set(String::new());
                        refetch.emit(());
                    }
                    Err(e) => toaster.api_error("Failed to add comment", &e),
                }
            });
        })
    };

    html! {
        <div class="bg-white shadow rounded p-4 space-y-3">
            <h3 class="font-medium">{"Comments"}</h3>
            if comments.loading && comments.data.is_empty() {
                <p class="text-sm text-gray-500">{"Loading comments..."}</p>
            }
            if let Some(error) = comments.error.as_ref() {
                <p class="text-sm text-red-600">{error.to_string()}</p>
            }
            <ul class="space-y-2">
                { for comments.data.iter().map(|c| html! {
                    <li key={c.id} class="border-l-2 border-gray-200 pl-3">
                        <div class="text-xs text-gray-500">{format!("{} on {}", c.author, format_timestamp(&c.created_at))}</div>
                        <div class="text-sm">{&c.text}</div>
                    </li>
                }) }
            </ul>
            <form class="space-y-2" {onsubmit}>
                <textarea
                    class="block w-full border rounded px-2 py-1 text-sm"
                    placeholder="Add a comment"
                    value={(*text).clone()}
                    oninput={on_text}
                />
                <button type="submit" class="px-3 py-1 bg-gray-800 text-white rounded text-sm disabled:opacity-50" disabled={*saving}>
                    {"Post comment"}
                </button>
            </form>
        </div>
    }
}
