//! Browser-backed session storage.

use gloo_storage::{LocalStorage, Storage};
use maintdesk_shared::session::{KeyValueStorage, SessionError, SessionStore};

/// `window.localStorage`, read and written as raw strings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, SessionError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| SessionError::Unavailable(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SessionError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| SessionError::Unavailable(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

pub type BrowserSession = SessionStore<BrowserStorage>;

pub fn browser_session() -> BrowserSession {
    SessionStore::new(BrowserStorage)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use maintdesk_shared::session::{AUTH_TOKEN_KEY, USER_KEY};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_values_are_stored_unquoted() {
        let storage = BrowserStorage;
        storage.set_item(AUTH_TOKEN_KEY, "abc123").unwrap();
        assert_eq!(LocalStorage::raw().get_item(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

        storage.set_item(USER_KEY, "{not json").unwrap();
        assert!(browser_session().load().is_err());
        browser_session().clear();
        assert_eq!(storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);
    }
}
