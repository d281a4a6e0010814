//! User models returned by the Redmine `/users/{id}.json` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a Redmine account record, including names, login, mail and any additional attributes the server reports.
#[derive(Debug, Deserialize, Clone)]
pub struct User {
    pub id: u64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub login: Option<String>,
    pub mail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UserEnvelope {
    #[serde(default)]
    pub user: Option<User>,
}

/// Staff directory entry: the four fields served to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub login: String,
}

impl UserProfile {
    /// Display name in `lastname firstname` order, trimmed when a part is missing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
            .trim()
            .to_string()
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname.unwrap_or_default(),
            lastname: user.lastname.unwrap_or_default(),
            login: user.login.unwrap_or_default(),
        }
    }
}
