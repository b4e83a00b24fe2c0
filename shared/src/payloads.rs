//! Request bodies sent to the REST API.
//!
//! Read models live in [`crate::models`]; these types only carry the fields a
//! client is allowed to write. Server-owned fields (`id`, `ticket_no`,
//! `raised_by`, timestamps) have no representation here.

use serde::{Deserialize, Serialize};

use crate::models::{FacilityStatus, FacilityType, Role, TicketStatus, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    pub section_id: i64,
    pub facility_id: i64,
}

/// Partial ticket update (PATCH). `None` fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,
}

impl TicketUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when any of title/description/section/facility is being changed.
    pub fn touches_details(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.section_id.is_some()
            || self.facility_id.is_some()
    }

    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Drop what a ticket ending up in `resulting` must not receive: a
    /// closed ticket gets no assignee and only a pending one keeps a reason.
    pub fn sanitize(mut self, resulting: TicketStatus) -> Self {
        if resulting == TicketStatus::Closed {
            self.assigned_to_id = None;
        }
        if resulting != TicketStatus::Pending {
            self.pending_reason = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityInput {
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: FacilityType,
    pub status: FacilityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub sections: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Pdf,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: String,
    pub format: ReportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_ticket_posts_exactly_four_fields() {
        let body = CreateTicket {
            title: "AC broken".to_string(),
            description: "Not cooling".to_string(),
            section_id: 3,
            facility_id: 7,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "title": "AC broken",
                "description": "Not cooling",
                "section_id": 3,
                "facility_id": 7,
            })
        );
    }

    #[test]
    fn test_ticket_update_omits_unset_fields() {
        let update = TicketUpdate::default().with_status(TicketStatus::Resolved);
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "resolved" }));
        assert!(!update.touches_details());
        assert!(TicketUpdate::default().is_empty());
    }

    #[test]
    fn test_sanitize_for_closed_ticket() {
        let update = TicketUpdate {
            assigned_to_id: Some(5),
            pending_reason: Some("waiting for parts".to_string()),
            ..TicketUpdate::default()
        }
        .with_status(TicketStatus::Closed)
        .sanitize(TicketStatus::Closed);
        assert_eq!(update.assigned_to_id, None);
        assert_eq!(update.pending_reason, None);
        assert_eq!(update.status, Some(TicketStatus::Closed));
    }

    #[test]
    fn test_sanitize_keeps_reason_when_pending() {
        let update = TicketUpdate {
            pending_reason: Some("waiting for parts".to_string()),
            ..TicketUpdate::default()
        }
        .sanitize(TicketStatus::Pending);
        assert_eq!(update.pending_reason.as_deref(), Some("waiting for parts"));
    }
}
