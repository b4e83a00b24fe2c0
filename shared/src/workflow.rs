//! Ticket status state machine.
//!
//! Every component that moves a ticket through its lifecycle asks this module
//! what is allowed instead of carrying its own conditionals. The mock backend
//! applies the same rules when it receives a PATCH.
//!
//! ```text
//! open -> assigned -> in_progress -> pending -> in_progress
//!                                 \-> resolved
//! any non-closed state -> closed (terminal)
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

use crate::models::{Role, Ticket, TicketStatus, User};
use crate::payloads::{NewFeedback, TicketUpdate};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("a ticket cannot move from {from} to {to}")]
    IllegalTransition { from: TicketStatus, to: TicketStatus },
    #[error("ticket details can only be edited by the raiser or an admin while the ticket is open")]
    DetailsLocked,
    #[error("only administrators can assign tickets")]
    AssignmentNotAllowed,
    #[error("an assigned ticket needs a technician")]
    AssigneeRequired,
    #[error("only the user who raised this ticket can do that")]
    NotRaiser,
    #[error("only the assigned technician can update this ticket")]
    NotAssignee,
    #[error("closing a ticket has to be confirmed")]
    ConfirmationRequired,
    #[error("a reason is required to put a ticket on hold")]
    PendingReasonRequired,
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),
    #[error("feedback can only be given once a ticket is resolved")]
    NotResolved,
    #[error("feedback has already been submitted for this ticket")]
    FeedbackExists,
    #[error("nothing to update")]
    EmptyUpdate,
}

/// The user performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn raised(&self, ticket: &Ticket) -> bool {
        ticket.raised_by == self.username
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role)
    }
}

/// Successors of `from` in the full transition graph.
pub fn successors(from: TicketStatus) -> &'static [TicketStatus] {
    use TicketStatus::*;
    match from {
        Open => &[Assigned, Closed],
        Assigned => &[InProgress, Closed],
        InProgress => &[Pending, Resolved, Closed],
        Pending => &[InProgress, Closed],
        Resolved => &[Closed],
        Closed => &[],
    }
}

/// Statuses `role` may move a ticket to from `current`.
pub fn next_allowed_statuses(current: TicketStatus, role: Role) -> BTreeSet<TicketStatus> {
    use TicketStatus::*;
    let graph = successors(current).iter().copied();
    match role {
        Role::Admin | Role::Manager => graph.collect(),
        Role::Technician => graph
            .filter(|to| {
                matches!(
                    (current, *to),
                    (Assigned, InProgress)
                        | (InProgress, Pending)
                        | (InProgress, Resolved)
                        | (Pending, InProgress)
                )
            })
            .collect(),
        // Raisers cancel an open ticket or confirm closure of a resolved one.
        Role::User => graph
            .filter(|to| *to == Closed && matches!(current, Open | Resolved))
            .collect(),
    }
}

pub fn can_transition(from: TicketStatus, to: TicketStatus, role: Role) -> bool {
    next_allowed_statuses(from, role).contains(&to)
}

/// Every path into `closed` goes through a blocking confirmation.
pub fn requires_confirmation(from: TicketStatus, to: TicketStatus) -> bool {
    to == TicketStatus::Closed && from != TicketStatus::Closed
}

/// Title, description, section and facility are editable by the raiser or an
/// admin, and only while the ticket is still open.
pub fn can_edit_details(ticket: &Ticket, actor: &Actor) -> bool {
    ticket.status == TicketStatus::Open && (actor.raised(ticket) || actor.role == Role::Admin)
}

pub fn can_assign(role: Role) -> bool {
    role.is_staff()
}

/// Payload for assigning `technician_id` to `ticket`.
///
/// An open ticket moves to `assigned` with the same request. A closed ticket
/// never receives an `assigned_to_id`.
pub fn assignment_update(ticket: &Ticket, technician_id: i64) -> TicketUpdate {
    match ticket.status {
        TicketStatus::Closed => TicketUpdate::default(),
        TicketStatus::Open => TicketUpdate {
            assigned_to_id: Some(technician_id),
            status: Some(TicketStatus::Assigned),
            ..TicketUpdate::default()
        },
        _ => TicketUpdate {
            assigned_to_id: Some(technician_id),
            ..TicketUpdate::default()
        },
    }
}

/// Validate `update` against the rules for `actor` and return the payload that
/// should actually be sent.
///
/// `confirmed` is the answer of the confirmation dialog; it only matters when
/// the update closes the ticket.
pub fn plan_update(
    ticket: &Ticket,
    actor: &Actor,
    mut update: TicketUpdate,
    confirmed: bool,
) -> Result<TicketUpdate, WorkflowError> {
    if update.touches_details() && !can_edit_details(ticket, actor) {
        return Err(WorkflowError::DetailsLocked);
    }

    if update.status == Some(ticket.status) {
        update.status = None;
    }

    if let Some(to) = update.status {
        match actor.role {
            Role::User if !actor.raised(ticket) => return Err(WorkflowError::NotRaiser),
            Role::Technician if !ticket.is_assigned_to(actor.id) => {
                return Err(WorkflowError::NotAssignee);
            }
            _ => {}
        }
        if !can_transition(ticket.status, to, actor.role) {
            return Err(WorkflowError::IllegalTransition {
                from: ticket.status,
                to,
            });
        }
        if requires_confirmation(ticket.status, to) && !confirmed {
            return Err(WorkflowError::ConfirmationRequired);
        }
    }

    if update.assigned_to_id.is_some() {
        if !can_assign(actor.role) {
            return Err(WorkflowError::AssignmentNotAllowed);
        }
        if update.status.is_none() && ticket.status == TicketStatus::Open {
            update.status = Some(TicketStatus::Assigned);
        }
    }

    let resulting = update.status.unwrap_or(ticket.status);
    if update.status == Some(TicketStatus::Assigned)
        && update.assigned_to_id.is_none()
        && ticket.assigned_to.is_none()
    {
        return Err(WorkflowError::AssigneeRequired);
    }
    let mut update = update.sanitize(resulting);

    if resulting == TicketStatus::Pending {
        let reason = update
            .pending_reason
            .take()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if reason.is_none() && update.status == Some(TicketStatus::Pending) {
            return Err(WorkflowError::PendingReasonRequired);
        }
        update.pending_reason = reason;
    }

    if update.is_empty() {
        return Err(WorkflowError::EmptyUpdate);
    }
    Ok(update)
}

/// Admins may delete any ticket; the raiser only while it is still open.
pub fn can_delete(ticket: &Ticket, actor: &Actor) -> bool {
    actor.role == Role::Admin || (actor.raised(ticket) && ticket.status == TicketStatus::Open)
}

pub fn validate_rating(rating: i64) -> Result<u8, WorkflowError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(WorkflowError::InvalidRating(rating))
    }
}

/// Build the single feedback submission a resolved ticket accepts.
pub fn feedback_submission(
    ticket: &Ticket,
    actor: &Actor,
    rating: i64,
    comment: &str,
) -> Result<NewFeedback, WorkflowError> {
    if ticket.status != TicketStatus::Resolved {
        return Err(WorkflowError::NotResolved);
    }
    if ticket.has_feedback() {
        return Err(WorkflowError::FeedbackExists);
    }
    if !actor.raised(ticket) {
        return Err(WorkflowError::NotRaiser);
    }
    let rating = validate_rating(rating)?;
    let comment = comment.trim();
    Ok(NewFeedback {
        rating,
        comment: (!comment.is_empty()).then(|| comment.to_string()),
    })
}

/// What the end-user ticket view offers for `ticket`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserActions {
    pub can_edit: bool,
    pub can_cancel: bool,
    pub can_rate: bool,
    pub can_confirm_closure: bool,
}

pub fn user_actions(ticket: &Ticket, actor: &Actor) -> UserActions {
    let owns = actor.raised(ticket);
    let may_close = can_transition(ticket.status, TicketStatus::Closed, actor.role)
        && (owns || actor.role.is_staff());
    UserActions {
        can_edit: can_edit_details(ticket, actor),
        can_cancel: ticket.status == TicketStatus::Open && may_close,
        can_rate: ticket.status == TicketStatus::Resolved && !ticket.has_feedback() && owns,
        can_confirm_closure: ticket.status == TicketStatus::Resolved
            && ticket.has_feedback()
            && may_close,
    }
}
