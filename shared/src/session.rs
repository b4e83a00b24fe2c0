//! Persisted login state.
//!
//! The browser keeps three keys in local storage. Everything that reads or
//! clears them goes through [`SessionStore`], which the HTTP client receives
//! at construction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::models::User;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("stored user is corrupt: {0}")]
    Corrupt(String),
    #[error("failed to serialize session: {0}")]
    Serialize(String),
}

/// Raw string key/value backend (browser local storage, or memory in tests).
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove_item(&self, key: &str);
}

/// Typed view of what is persisted for a signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get_item(AUTH_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }

    /// Header value for authenticated requests. The `Token` scheme is what the
    /// backend expects; it is not `Bearer`.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|token| format!("Token {token}"))
    }

    /// Load the full session. `Ok(None)` when nobody is signed in.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let Some(raw_user) = self.storage.get_item(USER_KEY)? else {
            return Ok(None);
        };
        let user: User =
            serde_json::from_str(&raw_user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        let refresh_token = self.storage.get_item(REFRESH_TOKEN_KEY)?;
        Ok(Some(Session {
            token,
            refresh_token,
            user,
        }))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let user =
            serde_json::to_string(&session.user).map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.storage.set_item(AUTH_TOKEN_KEY, &session.token)?;
        self.storage.set_item(USER_KEY, &user)?;
        match &session.refresh_token {
            Some(refresh) => self.storage.set_item(REFRESH_TOKEN_KEY, refresh)?,
            None => self.storage.remove_item(REFRESH_TOKEN_KEY),
        }
        Ok(())
    }

    /// Update only the cached user (after a profile edit).
    pub fn replace_user(&self, user: &User) -> Result<(), SessionError> {
        let user = serde_json::to_string(user).map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.storage.set_item(USER_KEY, &user)
    }

    pub fn clear(&self) {
        self.storage.remove_item(AUTH_TOKEN_KEY);
        self.storage.remove_item(REFRESH_TOKEN_KEY);
        self.storage.remove_item(USER_KEY);
    }
}

/// React to a 401: wipe the session and report where to navigate.
///
/// Returns `None` when the user is already on the login page, so a failed
/// login attempt does not reload it.
pub fn handle_unauthorized<S: KeyValueStorage>(
    session: &SessionStore<S>,
    current_path: &str,
) -> Option<&'static str> {
    session.clear();
    if current_path.trim_end_matches('/') == LOGIN_ROUTE {
        None
    } else {
        Some(LOGIN_ROUTE)
    }
}

/// In-memory storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}
