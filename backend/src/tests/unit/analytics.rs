use maintdesk_shared::TicketAnalytics;

use crate::store::Store;
use crate::tests::fixtures::{admin, jdoe, seed_now, tech_hvac};

#[test]
fn test_ticket_analytics_are_scoped() {
    let store = Store::load(None).unwrap();
    let all = store.ticket_analytics(&admin());
    assert_eq!(
        all,
        TicketAnalytics {
            total: 10,
            open: 2,
            assigned: 2,
            in_progress: 2,
            pending: 1,
            resolved: 2,
            closed: 1,
        }
    );

    let mine = store.ticket_analytics(&jdoe());
    assert_eq!(mine.total, 5);
    assert_eq!(mine.in_progress, 2);
    assert_eq!(mine.assigned, 0);

    assert_eq!(store.ticket_analytics(&tech_hvac()).total, 3);
}

#[test]
fn test_technician_performance() {
    let store = Store::load(None).unwrap();
    let perf = store.technician_performance();
    assert_eq!(perf.len(), 3);

    let hvac = perf.iter().find(|p| p.username == "tech_hvac").unwrap();
    assert_eq!((hvac.assigned, hvac.in_progress, hvac.resolved), (3, 1, 1));
    assert_eq!(hvac.average_resolution_hours, Some(29.0));

    let elec = perf.iter().find(|p| p.username == "tech_elec").unwrap();
    assert_eq!((elec.assigned, elec.in_progress, elec.resolved), (2, 0, 1));
    assert_eq!(elec.average_resolution_hours, Some(28.0));
}

#[test]
fn test_overdue_tickets_oldest_first() {
    let store = Store::load(None).unwrap();
    let overdue = store.overdue_tickets(seed_now(), 72);
    let ids: Vec<i64> = overdue.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(overdue[0].age_hours, 214);
    assert_eq!(overdue[2].assigned_to.as_deref(), Some("tech_hvac"));

    assert!(store.overdue_tickets(seed_now(), 1000).is_empty());
}

#[test]
fn test_admin_dashboard_totals() {
    let store = Store::load(None).unwrap();
    let dashboard = store.admin_dashboard(seed_now(), 72);
    assert_eq!(dashboard.ticket_stats.total, 10);
    assert_eq!(dashboard.total_users, 8);
    assert_eq!(dashboard.total_technicians, 3);
    assert_eq!(dashboard.total_sections, 4);
    assert_eq!(dashboard.total_facilities, 7);
    assert_eq!(dashboard.overdue_tickets.len(), 4);
}
