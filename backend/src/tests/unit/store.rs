use std::io::Write;

use maintdesk_shared::{
    CreateTicket, NewFeedback, RegisterRequest, Role, TicketStatus, TicketUpdate,
};
use tempfile::NamedTempFile;

use crate::store::{Store, StoreError, TicketListQuery};
use crate::tests::fixtures::{admin, alice, jdoe, minimal_fixture, seed_now, tech_hvac};
use crate::tests::helpers::init_test_logging;

fn seeded() -> Store {
    init_test_logging();
    Store::load(None).unwrap()
}

fn ids_of(tickets: &[maintdesk_shared::Ticket]) -> Vec<i64> {
    tickets.iter().map(|t| t.id).collect()
}

#[test]
fn test_load_fixture_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", minimal_fixture()).unwrap();

    let mut store = Store::load(Some(file.path())).unwrap();
    let tickets = store.all_tickets();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].ticket_no, "TKT-00041");
    assert_eq!(tickets[0].section.as_deref(), Some("Grounds"));

    let ops = maintdesk_shared::Actor::new(1, "ops", Role::Admin);
    let created = store
        .create_ticket(
            &ops,
            CreateTicket {
                title: "Broken barrier".to_string(),
                description: "Arm stuck in the raised position.".to_string(),
                section_id: 1,
                facility_id: 1,
            },
            seed_now(),
        )
        .unwrap();
    assert_eq!(created.id, 42);
}

#[test]
fn test_load_rejects_missing_and_malformed_files() {
    assert!(Store::load(Some(std::path::Path::new("/nonexistent/seed.json"))).is_err());

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(Store::load(Some(file.path())).is_err());
}

#[test]
fn test_credentials_and_registration() {
    let mut store = seeded();
    assert!(store.check_credentials("jdoe", "password123").is_some());
    assert!(store.check_credentials("jdoe", "wrong").is_none());

    let user = store
        .register(RegisterRequest {
            username: "carol".to_string(),
            password: "longenough".to_string(),
            email: "carol@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        })
        .unwrap();
    assert_eq!(user.role, Role::User);
    assert_eq!(user.id, 9);

    let duplicate = store.register(RegisterRequest {
        username: "carol".to_string(),
        password: "longenough".to_string(),
        email: "other@example.com".to_string(),
        first_name: String::new(),
        last_name: String::new(),
    });
    assert!(matches!(duplicate, Err(StoreError::Invalid { field: "username", .. })));
}

#[test]
fn test_ticket_visibility_by_role() {
    let store = seeded();
    let query = TicketListQuery::default();

    assert_eq!(store.tickets(&admin(), &query).len(), 10);
    // newest first
    assert_eq!(ids_of(&store.tickets(&jdoe(), &query)), vec![10, 7, 3, 1, 6]);
    assert_eq!(ids_of(&store.tickets(&tech_hvac(), &query)), vec![9, 5, 3]);

    assert!(matches!(store.ticket(&jdoe(), 2), Err(StoreError::NotFound("Ticket"))));
    assert!(store.ticket(&alice(), 2).is_ok());
}

#[test]
fn test_ticket_filters_and_ordering() {
    let store = seeded();
    let query = TicketListQuery {
        status: Some(TicketStatus::Open),
        ordering: Some("id".to_string()),
        ..TicketListQuery::default()
    };
    assert_eq!(ids_of(&store.tickets(&admin(), &query)), vec![1, 8]);

    let query = TicketListQuery {
        search: Some("BOILER".to_string()),
        ..TicketListQuery::default()
    };
    assert_eq!(ids_of(&store.tickets(&admin(), &query)), vec![5]);

    let query = TicketListQuery {
        raised_by: Some("alice".to_string()),
        assigned_to: Some(5),
        ordering: Some("id".to_string()),
        ..TicketListQuery::default()
    };
    assert_eq!(ids_of(&store.tickets(&admin(), &query)), vec![5, 9]);
}

#[test]
fn test_resolution_is_stamped_once() {
    let mut store = seeded();
    let now = seed_now();
    let ticket = store
        .update_ticket(
            &tech_hvac(),
            3,
            TicketUpdate::default().with_status(TicketStatus::Resolved),
            now,
        )
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Resolved);
    assert_eq!(ticket.resolved_at, Some(now));

    let later = now + chrono::Duration::hours(2);
    let closed = store
        .update_ticket(
            &admin(),
            3,
            TicketUpdate::default().with_status(TicketStatus::Closed),
            later,
        )
        .unwrap();
    assert_eq!(closed.resolved_at, Some(now));
    assert_eq!(closed.updated_at, later);
}

#[test]
fn test_pending_reason_follows_status() {
    let mut store = seeded();
    let on_hold = store
        .update_ticket(
            &tech_hvac(),
            3,
            TicketUpdate {
                status: Some(TicketStatus::Pending),
                pending_reason: Some("  Waiting on compressor  ".to_string()),
                ..TicketUpdate::default()
            },
            seed_now(),
        )
        .unwrap();
    assert_eq!(on_hold.pending_reason.as_deref(), Some("Waiting on compressor"));

    let resumed = store
        .update_ticket(
            &tech_hvac(),
            3,
            TicketUpdate::default().with_status(TicketStatus::InProgress),
            seed_now(),
        )
        .unwrap();
    assert_eq!(resumed.pending_reason, None);
}

#[test]
fn test_assignment_requires_a_technician() {
    let mut store = seeded();
    let update = TicketUpdate {
        assigned_to_id: Some(6),
        ..TicketUpdate::default()
    };
    let err = store.update_ticket(&admin(), 1, update, seed_now()).unwrap_err();
    assert!(matches!(err, StoreError::Invalid { field: "assigned_to_id", .. }));
    // the failed request leaves the ticket untouched
    assert_eq!(store.ticket(&admin(), 1).unwrap().status, TicketStatus::Open);
}

#[test]
fn test_feedback_only_once() {
    let mut store = seeded();
    let input = NewFeedback {
        rating: 4,
        comment: Some("Quick fix".to_string()),
    };
    let feedback = store.add_feedback(&alice(), 5, input.clone(), seed_now()).unwrap();
    assert_eq!(feedback.rated_by, "alice");
    assert_eq!(feedback.id, 3);
    assert!(store.ticket(&alice(), 5).unwrap().feedback.is_some());

    let again = store.add_feedback(&alice(), 5, input, seed_now());
    assert!(matches!(
        again,
        Err(StoreError::Workflow(maintdesk_shared::WorkflowError::FeedbackExists))
    ));
}

#[test]
fn test_comments_are_appended_in_order() {
    let mut store = seeded();
    store.add_comment(&alice(), 2, "Still dripping", seed_now()).unwrap();
    let comments = store.comments(&alice(), 2).unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].text, "Still dripping");
    assert_eq!(comments[1].author, "alice");

    let blank = store.add_comment(&alice(), 2, "   ", seed_now());
    assert!(matches!(blank, Err(StoreError::Invalid { field: "text", .. })));
}

#[test]
fn test_delete_ticket_permissions() {
    let mut store = seeded();
    assert!(matches!(store.delete_ticket(&jdoe(), 3), Err(StoreError::Forbidden(_))));
    store.delete_ticket(&jdoe(), 1).unwrap();
    store.delete_ticket(&admin(), 3).unwrap();
    assert!(store.comments(&admin(), 3).is_err());
    assert_eq!(store.all_tickets().len(), 8);
}

#[test]
fn test_delete_user_rules() {
    let mut store = seeded();
    assert!(matches!(store.delete_user(6), Err(StoreError::Conflict(_))));

    store.delete_user(3).unwrap();
    assert!(store.ticket(&admin(), 4).unwrap().assigned_to.is_none());
    assert!(store.ticket(&admin(), 6).unwrap().assigned_to.is_none());
    assert_eq!(store.technicians().len(), 2);
}

#[test]
fn test_referenced_sections_and_facilities_are_kept() {
    let mut store = seeded();
    assert!(matches!(store.delete_section(1), Err(StoreError::Conflict(_))));
    assert!(matches!(store.delete_facility(3), Err(StoreError::Conflict(_))));
}

#[test]
fn test_create_ticket_by_name() {
    let mut store = seeded();
    let ticket = store
        .create_ticket_by_name("jdoe", "AC broken", "Hot in here", "hvac", "conference room a", seed_now())
        .unwrap();
    assert_eq!(ticket.id, 11);
    assert_eq!(ticket.section.as_deref(), Some("HVAC"));
    assert_eq!(ticket.facility.as_deref(), Some("Conference Room A"));
    assert_eq!(ticket.raised_by, "jdoe");

    let unknown = store.create_ticket_by_name("jdoe", "x", "y", "Gardening", "Library", seed_now());
    assert!(matches!(unknown, Err(StoreError::Invalid { field: "section", .. })));
}
