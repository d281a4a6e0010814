use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::error::{RedmineError, Result};

pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";
pub const DEFAULT_USER_AGENT: &str = "redmine-today";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Basic-auth credentials sent in front of the Redmine API, typically for a
/// reverse proxy guarding the tracker.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl BasicAuth {
    /// Returns the `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("Basic {}", encoded)
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct RedmineConfig {
    pub base_url: String,
    pub api_key: String,
    pub basic_auth: Option<BasicAuth>,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl RedmineConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            basic_auth: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Enables basic auth only when both parts are non-empty; otherwise any
    /// previously configured pair is cleared.
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        let user = user.into();
        let password = password.into();
        self.basic_auth = if user.is_empty() || password.is_empty() {
            None
        } else {
            Some(BasicAuth { user, password })
        };
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// Checks the inputs every request depends on. Runs before any client is built.
    pub fn validate(&self) -> Result<()> {
        if self.base_root().trim().is_empty() {
            return Err(RedmineError::Configuration(
                "Redmine base URL is not set".to_string(),
            ));
        }
        if self.api_key.is_empty() {
            return Err(RedmineError::Configuration(
                "Redmine API key is not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL with trailing slashes removed.
    pub fn base_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Browsable page of an issue on the tracker.
    pub fn issue_url(&self, issue_id: u64) -> String {
        format!("{}/issues/{}", self.base_root(), issue_id)
    }
}

impl std::fmt::Debug for RedmineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedmineConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("basic_auth", &self.basic_auth)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
