//! List filters and their query-string encoding.
//!
//! Filters derive `PartialEq` so hooks can use them directly as effect
//! dependencies: two filters with the same values never trigger a refetch.

use crate::models::{Role, TicketStatus};

/// Page size used when the shared data context loads every user.
pub const ALL_USERS_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilters {
    pub status: Option<TicketStatus>,
    pub section: Option<i64>,
    pub facility: Option<i64>,
    pub assigned_to: Option<i64>,
    pub raised_by: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TicketFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "status", self.status.map(|s| s.as_str().to_string()));
        push(&mut pairs, "section", self.section.map(|v| v.to_string()));
        push(&mut pairs, "facility", self.facility.map(|v| v.to_string()));
        push(&mut pairs, "assigned_to", self.assigned_to.map(|v| v.to_string()));
        push(&mut pairs, "raised_by", self.raised_by.clone());
        push(&mut pairs, "search", self.search.clone());
        push(&mut pairs, "ordering", self.ordering.clone());
        push(&mut pairs, "page", self.page.map(|v| v.to_string()));
        push(&mut pairs, "page_size", self.page_size.map(|v| v.to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl UserQuery {
    pub fn all() -> Self {
        Self {
            page_size: Some(ALL_USERS_PAGE_SIZE),
            ..Self::default()
        }
    }

    pub fn technicians() -> Self {
        Self {
            role: Some(Role::Technician),
            page_size: Some(ALL_USERS_PAGE_SIZE),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "role", self.role.map(|r| r.as_str().to_string()));
        push(&mut pairs, "search", self.search.clone());
        push(&mut pairs, "page", self.page.map(|v| v.to_string()));
        push(&mut pairs, "page_size", self.page_size.map(|v| v.to_string()));
        pairs
    }
}

fn push(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        pairs.push((key, value));
    }
}

/// Append `pairs` to `path` as a query string.
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}{query}")
}
