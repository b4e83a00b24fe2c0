use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use maintdesk_shared::workflow::{self, Actor};
use maintdesk_shared::{
    Comment, CreateTicket, Feedback, NewFeedback, Role, Ticket, TicketStatus, TicketUpdate,
};
use serde::Deserialize;

use super::{next_id, Store, StoreError, StoreResult, TicketRecord};

pub const DEFAULT_ORDERING: &str = "-created_at";

/// Filters accepted by `GET /tickets/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketListQuery {
    pub status: Option<TicketStatus>,
    pub section: Option<i64>,
    pub facility: Option<i64>,
    pub assigned_to: Option<i64>,
    /// Username of the raiser.
    pub raised_by: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub fn ticket_number(id: i64) -> String {
    format!("TKT-{id:05}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Id,
    CreatedAt,
    UpdatedAt,
    Status,
    Title,
}

/// Parse a `?ordering=` value such as `-created_at`. Unknown fields yield
/// `None` and the caller falls back to [`DEFAULT_ORDERING`].
fn parse_ordering(raw: &str) -> Option<(SortKey, bool)> {
    let raw = raw.trim();
    let (field, descending) = match raw.strip_prefix('-') {
        Some(field) => (field, true),
        None => (raw, false),
    };
    let key = match field {
        "id" | "ticket_no" => SortKey::Id,
        "created_at" => SortKey::CreatedAt,
        "updated_at" => SortKey::UpdatedAt,
        "status" => SortKey::Status,
        "title" => SortKey::Title,
        _ => return None,
    };
    Some((key, descending))
}

fn compare(a: &Ticket, b: &Ticket, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::Status => a.status.cmp(&b.status),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

pub fn sort_tickets(tickets: &mut [Ticket], ordering: Option<&str>) {
    let (key, descending) = ordering
        .and_then(parse_ordering)
        .or_else(|| parse_ordering(DEFAULT_ORDERING))
        .unwrap_or((SortKey::CreatedAt, true));
    tickets.sort_by(|a, b| {
        let ord = compare(a, b, key).then_with(|| a.id.cmp(&b.id));
        if descending { ord.reverse() } else { ord }
    });
}

impl Store {
    /// Users see what they raised, technicians what they are assigned,
    /// admins and managers everything.
    pub(super) fn visible_to(actor: &Actor, ticket: &TicketRecord) -> bool {
        match actor.role {
            Role::Admin | Role::Manager => true,
            Role::Technician => ticket.assigned_to_id == Some(actor.id),
            Role::User => ticket.raised_by_id == actor.id,
        }
    }

    pub(super) fn ticket_view(&self, record: &TicketRecord) -> Ticket {
        let section = record
            .section_id
            .and_then(|id| self.find_section(id))
            .map(|s| s.name.clone());
        let facility = record
            .facility_id
            .and_then(|id| self.find_facility(id))
            .map(|f| f.name.clone());
        let raised_by = self
            .find_user(record.raised_by_id)
            .map(|u| u.profile.username.clone())
            .unwrap_or_default();
        let assigned_to = record
            .assigned_to_id
            .and_then(|id| self.find_user(id))
            .map(|u| u.profile.summary());
        Ticket {
            id: record.id,
            ticket_no: ticket_number(record.id),
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
            section,
            facility,
            raised_by,
            assigned_to,
            created_at: record.created_at,
            updated_at: record.updated_at,
            resolved_at: record.resolved_at,
            pending_reason: record.pending_reason.clone(),
            comments: self
                .comments
                .iter()
                .filter(|c| c.ticket == record.id)
                .cloned()
                .collect(),
            feedback: self.feedback.iter().find(|f| f.ticket == record.id).cloned(),
        }
    }

    fn visible_record(&self, actor: &Actor, id: i64) -> StoreResult<&TicketRecord> {
        self.tickets
            .iter()
            .find(|t| t.id == id && Self::visible_to(actor, t))
            .ok_or(StoreError::NotFound("Ticket"))
    }

    /// Every ticket, unscoped, in id order.
    pub fn all_tickets(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.tickets.iter().map(|t| self.ticket_view(t)).collect();
        tickets.sort_by_key(|t| t.id);
        tickets
    }

    pub fn tickets(&self, actor: &Actor, query: &TicketListQuery) -> Vec<Ticket> {
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut tickets: Vec<Ticket> = self
            .tickets
            .iter()
            .filter(|t| Self::visible_to(actor, t))
            .filter(|t| query.status.is_none_or(|s| t.status == s))
            .filter(|t| query.section.is_none_or(|s| t.section_id == Some(s)))
            .filter(|t| query.facility.is_none_or(|f| t.facility_id == Some(f)))
            .filter(|t| query.assigned_to.is_none_or(|a| t.assigned_to_id == Some(a)))
            .map(|t| self.ticket_view(t))
            .filter(|t| query.raised_by.as_deref().is_none_or(|r| t.raised_by == r))
            .filter(|t| {
                needle.as_deref().is_none_or(|n| {
                    t.title.to_lowercase().contains(n)
                        || t.description.to_lowercase().contains(n)
                        || t.ticket_no.to_lowercase().contains(n)
                })
            })
            .collect();
        sort_tickets(&mut tickets, query.ordering.as_deref());
        tickets
    }

    pub fn ticket(&self, actor: &Actor, id: i64) -> StoreResult<Ticket> {
        self.visible_record(actor, id).map(|t| self.ticket_view(t))
    }

    fn check_section_id(&self, id: i64) -> StoreResult<()> {
        match self.find_section(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::invalid(
                "section_id",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
        }
    }

    fn check_facility_id(&self, id: i64) -> StoreResult<()> {
        match self.find_facility(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::invalid(
                "facility_id",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
        }
    }

    fn check_technician(&self, id: i64) -> StoreResult<()> {
        match self.find_user(id) {
            Some(user) if user.profile.role == Role::Technician => Ok(()),
            Some(user) => Err(StoreError::invalid(
                "assigned_to_id",
                format!("{} is not a technician.", user.profile.username),
            )),
            None => Err(StoreError::invalid(
                "assigned_to_id",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
        }
    }

    /// New tickets start `open` and are raised by the caller.
    pub fn create_ticket(
        &mut self,
        actor: &Actor,
        input: CreateTicket,
        now: DateTime<Utc>,
    ) -> StoreResult<Ticket> {
        self.check_section_id(input.section_id)?;
        self.check_facility_id(input.facility_id)?;
        let record = TicketRecord {
            id: next_id(self.tickets.iter().map(|t| t.id)),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            status: TicketStatus::Open,
            section_id: Some(input.section_id),
            facility_id: Some(input.facility_id),
            raised_by_id: actor.id,
            assigned_to_id: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            pending_reason: None,
        };
        tracing::info!(ticket_id = record.id, raised_by = %actor.username, "Ticket created");
        let ticket = self.ticket_view(&record);
        self.tickets.push(record);
        Ok(ticket)
    }

    /// Apply a PATCH. The workflow rules decide what actually changes.
    pub fn update_ticket(
        &mut self,
        actor: &Actor,
        id: i64,
        update: TicketUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<Ticket> {
        let current = self.ticket(actor, id)?;
        let plan = workflow::plan_update(&current, actor, update, true)?;

        if let Some(section_id) = plan.section_id {
            self.check_section_id(section_id)?;
        }
        if let Some(facility_id) = plan.facility_id {
            self.check_facility_id(facility_id)?;
        }
        if let Some(technician_id) = plan.assigned_to_id {
            self.check_technician(technician_id)?;
        }

        let record = self
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound("Ticket"))?;
        if let Some(title) = plan.title {
            record.title = title.trim().to_string();
        }
        if let Some(description) = plan.description {
            record.description = description.trim().to_string();
        }
        if let Some(section_id) = plan.section_id {
            record.section_id = Some(section_id);
        }
        if let Some(facility_id) = plan.facility_id {
            record.facility_id = Some(facility_id);
        }
        if let Some(technician_id) = plan.assigned_to_id {
            record.assigned_to_id = Some(technician_id);
        }
        if let Some(status) = plan.status {
            tracing::info!(ticket_id = id, from = %record.status, to = %status, by = %actor.username, "Ticket status changed");
            record.status = status;
            if status.stamps_resolution() && record.resolved_at.is_none() {
                record.resolved_at = Some(now);
            }
        }
        if record.status == TicketStatus::Pending {
            if let Some(reason) = plan.pending_reason {
                record.pending_reason = Some(reason);
            }
        } else {
            record.pending_reason = None;
        }
        record.updated_at = now;

        let record = record.clone();
        Ok(self.ticket_view(&record))
    }

    pub fn delete_ticket(&mut self, actor: &Actor, id: i64) -> StoreResult<()> {
        let ticket = self.ticket(actor, id)?;
        if !workflow::can_delete(&ticket, actor) {
            return Err(StoreError::Forbidden(
                "You do not have permission to delete this ticket.".to_string(),
            ));
        }
        self.tickets.retain(|t| t.id != id);
        self.comments.retain(|c| c.ticket != id);
        self.feedback.retain(|f| f.ticket != id);
        tracing::info!(ticket_id = id, by = %actor.username, "Ticket deleted");
        Ok(())
    }

    pub fn comments(&self, actor: &Actor, ticket_id: i64) -> StoreResult<Vec<Comment>> {
        self.visible_record(actor, ticket_id)?;
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.ticket == ticket_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    /// Comments are append-only.
    pub fn add_comment(
        &mut self,
        actor: &Actor,
        ticket_id: i64,
        text: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Comment> {
        self.visible_record(actor, ticket_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::invalid("text", "This field may not be blank."));
        }
        let comment = Comment {
            id: next_id(self.comments.iter().map(|c| c.id)),
            ticket: ticket_id,
            text: text.to_string(),
            author: actor.username.clone(),
            created_at: now,
        };
        self.comments.push(comment.clone());
        if let Some(record) = self.tickets.iter_mut().find(|t| t.id == ticket_id) {
            record.updated_at = now;
        }
        Ok(comment)
    }

    pub fn feedback(&self, actor: &Actor, ticket_id: i64) -> StoreResult<Vec<Feedback>> {
        self.visible_record(actor, ticket_id)?;
        Ok(self
            .feedback
            .iter()
            .filter(|f| f.ticket == ticket_id)
            .cloned()
            .collect())
    }

    /// One rating per ticket, from the raiser, once it is resolved.
    pub fn add_feedback(
        &mut self,
        actor: &Actor,
        ticket_id: i64,
        input: NewFeedback,
        now: DateTime<Utc>,
    ) -> StoreResult<Feedback> {
        let ticket = self.ticket(actor, ticket_id)?;
        let accepted = workflow::feedback_submission(
            &ticket,
            actor,
            i64::from(input.rating),
            input.comment.as_deref().unwrap_or(""),
        )?;
        let feedback = Feedback {
            id: next_id(self.feedback.iter().map(|f| f.id)),
            ticket: ticket_id,
            rated_by: actor.username.clone(),
            rating: accepted.rating,
            comment: accepted.comment,
            created_at: now,
        };
        tracing::info!(ticket_id, rating = feedback.rating, "Feedback recorded");
        self.feedback.push(feedback.clone());
        Ok(feedback)
    }

    /// Create a ticket by section and facility name on behalf of `raised_by`.
    pub fn create_ticket_by_name(
        &mut self,
        raised_by: &str,
        title: &str,
        description: &str,
        section: &str,
        facility: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Ticket> {
        let actor = self
            .users
            .iter()
            .find(|u| u.profile.username == raised_by)
            .map(|u| Actor::from(&u.profile))
            .ok_or(StoreError::NotFound("User"))?;
        let section_id = self
            .sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(section.trim()))
            .map(|s| s.id)
            .ok_or_else(|| StoreError::invalid("section", format!("Unknown section {section}")))?;
        let facility_id = self
            .facilities
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(facility.trim()))
            .map(|f| f.id)
            .ok_or_else(|| {
                StoreError::invalid("facility", format!("Unknown facility {facility}"))
            })?;
        self.create_ticket(
            &actor,
            CreateTicket {
                title: title.to_string(),
                description: description.to_string(),
                section_id,
                facility_id,
            },
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(id: i64, title: &str, day: u32) -> Ticket {
        let at = Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap();
        Ticket {
            id,
            ticket_no: ticket_number(id),
            title: title.to_string(),
            description: String::new(),
            status: TicketStatus::Open,
            section: None,
            facility: None,
            raised_by: "jdoe".to_string(),
            assigned_to: None,
            created_at: at,
            updated_at: at,
            resolved_at: None,
            pending_reason: None,
            comments: vec![],
            feedback: None,
        }
    }

    #[test]
    fn test_ticket_numbers_are_zero_padded() {
        assert_eq!(ticket_number(7), "TKT-00007");
    }

    #[test]
    fn test_default_ordering_is_newest_first() {
        let mut tickets = vec![ticket(1, "b", 1), ticket(2, "a", 3), ticket(3, "c", 2)];
        sort_tickets(&mut tickets, None);
        assert_eq!(tickets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }

    #[test]
    fn test_ordering_by_title_and_unknown_field() {
        let mut tickets = vec![ticket(1, "b", 1), ticket(2, "A", 3), ticket(3, "c", 2)];
        sort_tickets(&mut tickets, Some("title"));
        assert_eq!(tickets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1, 3]);

        sort_tickets(&mut tickets, Some("-priority"));
        assert_eq!(tickets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3, 1]);
    }
}
