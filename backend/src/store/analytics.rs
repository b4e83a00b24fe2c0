//! Aggregates computed from the live store on every request.

use chrono::{DateTime, Utc};
use maintdesk_shared::workflow::Actor;
use maintdesk_shared::{
    AdminDashboard, OverdueTicket, Role, TechnicianPerformance, TicketAnalytics, TicketStatus,
};

use super::Store;

impl Store {
    /// Status counts over the tickets `actor` can see.
    pub fn ticket_analytics(&self, actor: &Actor) -> TicketAnalytics {
        TicketAnalytics::from_statuses(
            self.tickets
                .iter()
                .filter(|t| Self::visible_to(actor, t))
                .map(|t| t.status),
        )
    }

    pub fn technician_performance(&self) -> Vec<TechnicianPerformance> {
        self.users
            .iter()
            .map(|u| &u.profile)
            .filter(|u| u.role == Role::Technician)
            .map(|tech| {
                let mine: Vec<_> = self
                    .tickets
                    .iter()
                    .filter(|t| t.assigned_to_id == Some(tech.id))
                    .collect();
                let resolution_hours: Vec<f64> = mine
                    .iter()
                    .filter_map(|t| t.resolved_at.map(|at| at - t.created_at))
                    .map(|d| d.num_minutes() as f64 / 60.0)
                    .collect();
                let average_resolution_hours = (!resolution_hours.is_empty()).then(|| {
                    let mean = resolution_hours.iter().sum::<f64>() / resolution_hours.len() as f64;
                    (mean * 10.0).round() / 10.0
                });
                TechnicianPerformance {
                    technician_id: tech.id,
                    username: tech.username.clone(),
                    assigned: mine.len() as u64,
                    in_progress: mine
                        .iter()
                        .filter(|t| t.status == TicketStatus::InProgress)
                        .count() as u64,
                    resolved: mine.iter().filter(|t| t.status.stamps_resolution()).count() as u64,
                    average_resolution_hours,
                }
            })
            .collect()
    }

    /// Unresolved tickets at least `threshold_hours` old, oldest first.
    pub fn overdue_tickets(&self, now: DateTime<Utc>, threshold_hours: i64) -> Vec<OverdueTicket> {
        let mut overdue: Vec<OverdueTicket> = self
            .tickets
            .iter()
            .filter(|t| !t.status.stamps_resolution())
            .map(|t| (t, (now - t.created_at).num_hours()))
            .filter(|(_, age)| *age >= threshold_hours)
            .map(|(t, age_hours)| {
                let view = self.ticket_view(t);
                OverdueTicket {
                    id: view.id,
                    ticket_no: view.ticket_no,
                    title: view.title,
                    status: view.status,
                    age_hours,
                    assigned_to: view.assigned_to.map(|u| u.username),
                }
            })
            .collect();
        overdue.sort_by(|a, b| b.age_hours.cmp(&a.age_hours).then(a.id.cmp(&b.id)));
        overdue
    }

    pub fn admin_dashboard(&self, now: DateTime<Utc>, overdue_after_hours: i64) -> AdminDashboard {
        AdminDashboard {
            ticket_stats: TicketAnalytics::from_statuses(self.tickets.iter().map(|t| t.status)),
            technician_performance: self.technician_performance(),
            overdue_tickets: self.overdue_tickets(now, overdue_after_hours),
            total_users: self.users.len() as u64,
            total_technicians: self
                .users
                .iter()
                .filter(|u| u.profile.role == Role::Technician)
                .count() as u64,
            total_sections: self.sections.len() as u64,
            total_facilities: self.facilities.len() as u64,
        }
    }
}
