//! Error model used by Redmine API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedmineError>;

/// Represents the failures a Redmine lookup can end in: missing configuration, a failed issue listing, HTTP errors with status and message, authentication failures, timeouts, network issues, undecodable payloads and other unexpected errors.
#[derive(Debug, Error)]
pub enum RedmineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("failed to list issues at offset {offset}: {source}")]
    IssueListing {
        offset: u64,
        #[source]
        source: Box<RedmineError>,
    },
    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("missing payload: {0}")]
    MissingPayload(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl RedmineError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        RedmineError::Http {
            status,
            message: message.into(),
        }
    }

    /// Wraps a failure of the page request made at `offset`.
    pub fn listing(offset: u64, source: RedmineError) -> Self {
        RedmineError::IssueListing {
            offset,
            source: Box::new(source),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RedmineError::Configuration(_))
    }
}

impl From<reqwest::Error> for RedmineError {
    /// Converts reqwest errors into semantic RedmineError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RedmineError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            RedmineError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            RedmineError::Network(err.to_string())
        } else if err.is_decode() {
            RedmineError::Serialization(err.to_string())
        } else {
            RedmineError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RedmineError {
    fn from(err: serde_json::Error) -> Self {
        RedmineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_error_names_offset_and_cause() {
        let err = RedmineError::listing(200, RedmineError::http(StatusCode::BAD_GATEWAY, "down"));
        let message = err.to_string();
        assert!(message.contains("offset 200"));
        assert!(message.contains("502"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn serde_errors_become_serialization_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert!(matches!(RedmineError::from(err), RedmineError::Serialization(_)));
    }
}
