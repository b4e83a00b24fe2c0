use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// TICKETS
// ============================================

/// Lifecycle state of a maintenance ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Assigned,
    InProgress,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Open,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
        TicketStatus::Pending,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Pending => "Pending",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// `closed` is the only state with no way out.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Statuses for which the backend stamps `resolved_at`.
    pub fn stamps_resolution(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Nested user reference embedded in tickets (`assigned_to`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserSummary {
    pub fn display_name(&self) -> String {
        full_name_or_username(&self.first_name, &self.last_name, &self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub ticket_no: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    /// Section name; writes go through `section_id`.
    pub section: Option<String>,
    /// Facility name; writes go through `facility_id`.
    pub facility: Option<String>,
    /// Username of the raising user.
    pub raised_by: String,
    pub assigned_to: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending_reason: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

impl Ticket {
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_to.as_ref().is_some_and(|u| u.id == user_id)
    }

    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub ticket: i64,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub ticket: i64,
    pub rated_by: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================
// REFERENCE DATA
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Usernames of technicians working in this section.
    #[serde(default)]
    pub technicians: Vec<String>,
}

/// Kind of facility. Values the client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Building,
    Room,
    Equipment,
    Outdoor,
    #[serde(untagged)]
    Other(String),
}

impl FacilityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Building => "building",
            Self::Room => "room",
            Self::Equipment => "equipment",
            Self::Outdoor => "outdoor",
            Self::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Active,
    Inactive,
    UnderMaintenance,
}

impl FacilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::UnderMaintenance => "under_maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub status: FacilityStatus,
    #[serde(default)]
    pub location: Option<String>,
}

// ============================================
// USERS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    Technician,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Technician => "technician",
            Self::Manager => "manager",
        }
    }

    /// Admins and managers share the administrative views.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "technician" => Ok(Self::Technician),
            "manager" => Ok(Self::Manager),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    /// Section ids the user belongs to.
    #[serde(default)]
    pub sections: Vec<i64>,
}

impl User {
    pub fn display_name(&self) -> String {
        full_name_or_username(&self.first_name, &self.last_name, &self.username)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

fn full_name_or_username(first: &str, last: &str, username: &str) -> String {
    let full = format!("{} {}", first.trim(), last.trim());
    let full = full.trim();
    if full.is_empty() {
        username.to_string()
    } else {
        full.to_string()
    }
}

// ============================================
// ANALYTICS
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketAnalytics {
    pub total: u64,
    pub open: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub pending: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl TicketAnalytics {
    pub fn count(&self, status: TicketStatus) -> u64 {
        match status {
            TicketStatus::Open => self.open,
            TicketStatus::Assigned => self.assigned,
            TicketStatus::InProgress => self.in_progress,
            TicketStatus::Pending => self.pending,
            TicketStatus::Resolved => self.resolved,
            TicketStatus::Closed => self.closed,
        }
    }

    /// Tally tickets by status.
    pub fn from_statuses(statuses: impl IntoIterator<Item = TicketStatus>) -> Self {
        let mut stats = Self::default();
        for status in statuses {
            stats.total += 1;
            match status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::Assigned => stats.assigned += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::Pending => stats.pending += 1,
                TicketStatus::Resolved => stats.resolved += 1,
                TicketStatus::Closed => stats.closed += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianPerformance {
    pub technician_id: i64,
    pub username: String,
    pub assigned: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub average_resolution_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueTicket {
    pub id: i64,
    pub ticket_no: String,
    pub title: String,
    pub status: TicketStatus,
    pub age_hours: i64,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub ticket_stats: TicketAnalytics,
    pub technician_performance: Vec<TechnicianPerformance>,
    pub overdue_tickets: Vec<OverdueTicket>,
    pub total_users: u64,
    pub total_technicians: u64,
    pub total_sections: u64,
    pub total_facilities: u64,
}

// ============================================
// REPORTS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportType {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================
// LIST RESPONSES
// ============================================

/// Paginated envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// List endpoints answer either with a bare array or with a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.results,
            Self::Plain(items) => items,
        }
    }

    pub fn total(&self) -> u64 {
        match self {
            Self::Paged(page) => page.count,
            Self::Plain(items) => items.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(TicketStatus::InProgress).unwrap(), json!("in_progress"));
        assert_eq!("pending".parse::<TicketStatus>().unwrap(), TicketStatus::Pending);
        assert!("archived".parse::<TicketStatus>().is_err());
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Resolved.is_terminal());
    }

    #[test]
    fn test_unknown_facility_type_is_preserved() {
        let facility: Facility = serde_json::from_value(json!({
            "id": 1,
            "name": "Boiler room",
            "type": "plant",
            "status": "under_maintenance",
        }))
        .unwrap();
        assert_eq!(facility.facility_type, FacilityType::Other("plant".to_string()));
        assert_eq!(facility.status, FacilityStatus::UnderMaintenance);

        let known: FacilityType = serde_json::from_value(json!("room")).unwrap();
        assert_eq!(known, FacilityType::Room);
    }

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let plain: ListResponse<Section> =
            serde_json::from_value(json!([{ "id": 1, "name": "Electrical" }])).unwrap();
        assert_eq!(plain.total(), 1);

        let paged: ListResponse<Section> = serde_json::from_value(json!({
            "count": 12,
            "next": "http://localhost:8000/api/sections/?page=2",
            "previous": null,
            "results": [{ "id": 1, "name": "Electrical" }, { "id": 2, "name": "Plumbing" }],
        }))
        .unwrap();
        assert_eq!(paged.total(), 12);
        assert_eq!(paged.into_items().len(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            id: 1,
            username: "tech1".to_string(),
            first_name: String::new(),
            last_name: " ".to_string(),
            email: String::new(),
            role: Role::Technician,
            sections: vec![],
        };
        assert_eq!(user.display_name(), "tech1");
    }

    #[test]
    fn test_ticket_analytics_tally() {
        let stats = TicketAnalytics::from_statuses([
            TicketStatus::Open,
            TicketStatus::Open,
            TicketStatus::Closed,
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(TicketStatus::Open), 2);
        assert_eq!(stats.count(TicketStatus::Closed), 1);
    }
}
