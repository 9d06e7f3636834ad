//! Per-client session storage
//!
//! String values under string keys, with typed accessors for the entries
//! billed relies on. Cleared wholesale on logout.

use crate::core::error::SessionError;
use crate::core::user::User;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key of the connected user (JSON)
pub const USER_KEY: &str = "user";
/// Key of the token returned by the store on login
pub const JWT_KEY: &str = "jwt";

/// Session handle shared between a client's containers
pub type SharedSession = Arc<RwLock<Session>>;

#[derive(Debug, Clone, Default)]
pub struct Session {
    items: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into the handle containers expect
    pub fn shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) {
        self.items.insert(key.to_string(), value.into());
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The connected user, if any
    pub fn user(&self) -> Result<Option<User>, SessionError> {
        self.get_item(USER_KEY)
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| SessionError::InvalidValue {
                    key: USER_KEY.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn set_user(&mut self, user: &User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user).map_err(|e| SessionError::InvalidValue {
            key: USER_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.set_item(USER_KEY, raw);
        Ok(())
    }
}
