//! In-memory data store behind both mock APIs.
//!
//! The store is loaded once from a JSON fixture and mutated in place. It
//! holds no persistence; restarting the server restores the fixture.

mod analytics;
mod tickets;

pub use tickets::TicketListQuery;

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use maintdesk_shared::{
    Comment, Facility, FacilityInput, Feedback, NewUser, RegisterRequest, Role, Section,
    SectionInput, TicketStatus, User, UserUpdate, WorkflowError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_FIXTURE: &str = include_str!("../../fixtures/seed.json");

/// Length of an auth token in bytes; hex encoding doubles it.
const TOKEN_BYTES: usize = 20;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl StoreError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A user together with the development password from the fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub profile: User,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Stored ticket row. References are ids; [`Store`] joins them into the
/// nested read model on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub section_id: Option<i64>,
    pub facility_id: Option<i64>,
    pub raised_by_id: i64,
    #[serde(default)]
    pub assigned_to_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pending_reason: Option<String>,
}

/// On-disk shape of the seed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub tickets: Vec<TicketRecord>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

#[derive(Debug, Default)]
pub struct Store {
    users: Vec<UserRecord>,
    sections: Vec<SectionRecord>,
    facilities: Vec<Facility>,
    tickets: Vec<TicketRecord>,
    comments: Vec<Comment>,
    feedback: Vec<Feedback>,
    tokens: HashMap<String, i64>,
}

impl Store {
    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            users: fixture.users,
            sections: fixture.sections,
            facilities: fixture.facilities,
            tickets: fixture.tickets,
            comments: fixture.comments,
            feedback: fixture.feedback,
            tokens: HashMap::new(),
        }
    }

    /// Load the fixture at `path`, or the embedded seed data when `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let fixture: Fixture = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading fixture {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing fixture {}", path.display()))?
            }
            None => serde_json::from_str(DEFAULT_FIXTURE).context("parsing embedded fixture")?,
        };
        tracing::info!(
            users = fixture.users.len(),
            tickets = fixture.tickets.len(),
            "Loaded fixture"
        );
        Ok(Self::from_fixture(fixture))
    }

    // ============================================
    // AUTH
    // ============================================

    pub fn check_credentials(&self, username: &str, password: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.profile.username == username && u.password == password)
            .map(|u| u.profile.clone())
    }

    /// Mint an opaque 40 hex character token for `user_id`.
    pub fn issue_token(&mut self, user_id: i64) -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        let token = hex::encode(bytes);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<User> {
        let id = self.tokens.get(token)?;
        self.find_user(*id).map(|u| u.profile.clone())
    }

    pub fn revoke_token(&mut self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    /// Self-service sign up. New accounts always get the `user` role.
    pub fn register(&mut self, request: RegisterRequest) -> StoreResult<User> {
        self.create_user(NewUser {
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            role: Role::User,
            sections: Vec::new(),
        })
    }

    // ============================================
    // USERS
    // ============================================

    fn find_user(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.profile.id == id)
    }

    pub fn users(&self, role: Option<Role>, search: Option<&str>) -> Vec<User> {
        let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());
        self.users
            .iter()
            .map(|u| &u.profile)
            .filter(|u| role.is_none_or(|r| u.role == r))
            .filter(|u| {
                needle.as_deref().is_none_or(|n| {
                    [&u.username, &u.first_name, &u.last_name, &u.email]
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .cloned()
            .collect()
    }

    pub fn technicians(&self) -> Vec<User> {
        self.users(Some(Role::Technician), None)
    }

    pub fn user(&self, id: i64) -> StoreResult<User> {
        self.find_user(id)
            .map(|u| u.profile.clone())
            .ok_or(StoreError::NotFound("User"))
    }

    pub fn create_user(&mut self, input: NewUser) -> StoreResult<User> {
        let username = input.username.trim().to_string();
        if self.users.iter().any(|u| u.profile.username == username) {
            return Err(StoreError::invalid(
                "username",
                "A user with that username already exists.",
            ));
        }
        self.check_sections(&input.sections)?;
        let user = User {
            id: next_id(self.users.iter().map(|u| u.profile.id)),
            username,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            role: input.role,
            sections: input.sections,
        };
        tracing::debug!(user_id = user.id, role = %user.role, "Created user");
        self.users.push(UserRecord {
            profile: user.clone(),
            password: input.password,
        });
        Ok(user)
    }

    pub fn update_user(&mut self, id: i64, update: UserUpdate) -> StoreResult<User> {
        if let Some(sections) = &update.sections {
            self.check_sections(sections)?;
        }
        let record = self
            .users
            .iter_mut()
            .find(|u| u.profile.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        let user = &mut record.profile;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(sections) = update.sections {
            user.sections = sections;
        }
        Ok(user.clone())
    }

    pub fn delete_user(&mut self, id: i64) -> StoreResult<()> {
        if self.tickets.iter().any(|t| t.raised_by_id == id) {
            return Err(StoreError::Conflict(
                "User has raised tickets and cannot be deleted".to_string(),
            ));
        }
        let before = self.users.len();
        self.users.retain(|u| u.profile.id != id);
        if self.users.len() == before {
            return Err(StoreError::NotFound("User"));
        }
        self.tokens.retain(|_, user_id| *user_id != id);
        for ticket in self.tickets.iter_mut().filter(|t| t.assigned_to_id == Some(id)) {
            ticket.assigned_to_id = None;
        }
        Ok(())
    }

    fn check_sections(&self, ids: &[i64]) -> StoreResult<()> {
        match ids.iter().find(|id| self.find_section(**id).is_none()) {
            Some(id) => Err(StoreError::invalid(
                "sections",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
            None => Ok(()),
        }
    }

    // ============================================
    // SECTIONS
    // ============================================

    fn find_section(&self, id: i64) -> Option<&SectionRecord> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_view(&self, record: &SectionRecord) -> Section {
        Section {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            technicians: self
                .users
                .iter()
                .map(|u| &u.profile)
                .filter(|u| u.role == Role::Technician && u.sections.contains(&record.id))
                .map(|u| u.username.clone())
                .collect(),
        }
    }

    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(|s| self.section_view(s)).collect()
    }

    pub fn section(&self, id: i64) -> StoreResult<Section> {
        self.find_section(id)
            .map(|s| self.section_view(s))
            .ok_or(StoreError::NotFound("Section"))
    }

    pub fn create_section(&mut self, input: SectionInput) -> StoreResult<Section> {
        self.ensure_unique_section_name(&input.name, None)?;
        let record = SectionRecord {
            id: next_id(self.sections.iter().map(|s| s.id)),
            name: input.name.trim().to_string(),
            description: input.description,
        };
        let section = self.section_view(&record);
        self.sections.push(record);
        Ok(section)
    }

    pub fn update_section(&mut self, id: i64, input: SectionInput) -> StoreResult<Section> {
        self.ensure_unique_section_name(&input.name, Some(id))?;
        let record = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound("Section"))?;
        record.name = input.name.trim().to_string();
        record.description = input.description;
        let record = record.clone();
        Ok(self.section_view(&record))
    }

    pub fn delete_section(&mut self, id: i64) -> StoreResult<()> {
        if self.tickets.iter().any(|t| t.section_id == Some(id)) {
            return Err(StoreError::Conflict(
                "Section is referenced by tickets and cannot be deleted".to_string(),
            ));
        }
        let before = self.sections.len();
        self.sections.retain(|s| s.id != id);
        if self.sections.len() == before {
            return Err(StoreError::NotFound("Section"));
        }
        for user in &mut self.users {
            user.profile.sections.retain(|s| *s != id);
        }
        Ok(())
    }

    fn ensure_unique_section_name(&self, name: &str, except: Option<i64>) -> StoreResult<()> {
        let name = name.trim();
        let taken = self
            .sections
            .iter()
            .any(|s| Some(s.id) != except && s.name.eq_ignore_ascii_case(name));
        if taken {
            Err(StoreError::invalid("name", "A section with this name already exists."))
        } else {
            Ok(())
        }
    }

    // ============================================
    // FACILITIES
    // ============================================

    fn find_facility(&self, id: i64) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn facilities(&self) -> Vec<Facility> {
        self.facilities.clone()
    }

    pub fn facility(&self, id: i64) -> StoreResult<Facility> {
        self.find_facility(id)
            .cloned()
            .ok_or(StoreError::NotFound("Facility"))
    }

    pub fn create_facility(&mut self, input: FacilityInput) -> StoreResult<Facility> {
        let facility = Facility {
            id: next_id(self.facilities.iter().map(|f| f.id)),
            name: input.name.trim().to_string(),
            facility_type: input.facility_type,
            status: input.status,
            location: input.location,
        };
        self.facilities.push(facility.clone());
        Ok(facility)
    }

    pub fn update_facility(&mut self, id: i64, input: FacilityInput) -> StoreResult<Facility> {
        let facility = self
            .facilities
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::NotFound("Facility"))?;
        facility.name = input.name.trim().to_string();
        facility.facility_type = input.facility_type;
        facility.status = input.status;
        facility.location = input.location;
        Ok(facility.clone())
    }

    pub fn delete_facility(&mut self, id: i64) -> StoreResult<()> {
        if self.tickets.iter().any(|t| t.facility_id == Some(id)) {
            return Err(StoreError::Conflict(
                "Facility is referenced by tickets and cannot be deleted".to_string(),
            ));
        }
        let before = self.facilities.len();
        self.facilities.retain(|f| f.id != id);
        if self.facilities.len() == before {
            return Err(StoreError::NotFound("Facility"));
        }
        Ok(())
    }
}

/// Next id after the largest existing one.
pub fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_max_plus_one() {
        assert_eq!(next_id([3, 9, 4].into_iter()), 10);
        assert_eq!(next_id(std::iter::empty()), 1);
    }

    #[test]
    fn test_tokens_are_forty_hex_chars() {
        let mut store = Store::load(None).unwrap();
        let token = store.issue_token(1);
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(store.user_for_token(&token).map(|u| u.id), Some(1));
        assert!(store.revoke_token(&token));
        assert!(store.user_for_token(&token).is_none());
    }
}
