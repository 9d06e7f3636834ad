//! Connected user as kept in the session

use serde::{Deserialize, Serialize};

/// Kind of account behind a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

/// The JSON object stored under the session key `user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: UserType,

    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl User {
    /// A user that just went through the login form
    pub fn connected(user_type: UserType, email: &str, password: &str) -> Self {
        Self {
            user_type,
            email: email.to_string(),
            password: Some(password.to_string()),
            status: Some("connected".to_string()),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }
}
