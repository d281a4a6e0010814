//! Environment-backed application configuration.

use std::env;

use log::warn;
use redmine_api::{parse_user_ids, RedmineConfig, RedmineError};

pub const ENV_BASE_URL: &str = "REDMINE_BASE_URL";
pub const ENV_API_KEY: &str = "REDMINE_API_KEY";
pub const ENV_BASIC_USER: &str = "BASIC_USER";
pub const ENV_BASIC_PASSWORD: &str = "BASIC_PASSWORD";
pub const ENV_STAFF_USER_IDS: &str = "STAFF_USER_IDS";
pub const ENV_DEFAULT_TARGET_USER_ID: &str = "DEFAULT_TARGET_USER_ID";

/// Represents the settings read from the process environment: Redmine connection, optional basic-auth pair, staff id list and the CLI's default target user.
/// Empty values are treated as unset.
#[derive(Clone, Default)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub basic_user: Option<String>,
    pub basic_password: Option<String>,
    pub staff_user_ids: Option<String>,
    pub default_target_user_id: Option<u64>,
}

impl AppConfig {
    /// Loads `.env` (when present) into the environment, then reads the config.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let default_target_user_id = read(ENV_DEFAULT_TARGET_USER_ID).and_then(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| warn!("Ignoring non-numeric {}: {}", ENV_DEFAULT_TARGET_USER_ID, raw))
                .ok()
        });

        Self {
            base_url: read(ENV_BASE_URL),
            api_key: read(ENV_API_KEY),
            basic_user: read(ENV_BASIC_USER),
            basic_password: read(ENV_BASIC_PASSWORD),
            staff_user_ids: read(ENV_STAFF_USER_IDS),
            default_target_user_id,
        }
    }

    /// Connection settings for the Redmine client.
    pub fn redmine_config(&self) -> Result<RedmineConfig, RedmineError> {
        let base_url = self
            .base_url
            .clone()
            .ok_or_else(|| not_set(ENV_BASE_URL))?;
        let api_key = self.api_key.clone().ok_or_else(|| not_set(ENV_API_KEY))?;

        let config = RedmineConfig::new(base_url, api_key)
            .with_basic_auth(
                self.basic_user.clone().unwrap_or_default(),
                self.basic_password.clone().unwrap_or_default(),
            )
            .with_user_agent(user_agent());
        Ok(config)
    }

    /// Staff ids from `STAFF_USER_IDS`, split and trimmed. A list with no
    /// ids left after trimming counts as unset.
    pub fn staff_user_ids(&self) -> Result<Vec<String>, RedmineError> {
        let ids = self
            .staff_user_ids
            .as_deref()
            .map(parse_user_ids)
            .unwrap_or_default();
        if ids.is_empty() {
            return Err(not_set(ENV_STAFF_USER_IDS));
        }
        Ok(ids)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("basic_user", &self.basic_user)
            .field("basic_password", &self.basic_password.as_ref().map(|_| "***"))
            .field("staff_user_ids", &self.staff_user_ids)
            .field("default_target_user_id", &self.default_target_user_id)
            .finish()
    }
}

fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn not_set(key: &str) -> RedmineError {
    RedmineError::Configuration(format!("{} is not set", key))
}
