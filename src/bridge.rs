//! Request and response shapes shared by the HTTP server and the serverless
//! handler.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Query string of the issues endpoint.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct IssueParams {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl IssueParams {
    pub fn target_user_id(&self) -> Result<u64, AppError> {
        let raw = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::BadRequest("user_id is required".to_string()))?;
        parse_id("user_id", raw)
    }

    pub fn project_id(&self) -> Result<Option<u64>, AppError> {
        match self.project_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_id("project_id", raw).map(Some),
        }
    }
}

fn parse_id(name: &str, raw: &str) -> Result<u64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer, got {:?}", name, raw)))
}

/// JSON body returned with every failed request.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(user_id: Option<&str>, project_id: Option<&str>) -> IssueParams {
        IssueParams {
            user_id: user_id.map(str::to_string),
            project_id: project_id.map(str::to_string),
        }
    }

    #[test]
    fn parses_numeric_ids() {
        let parsed = params(Some(" 7 "), Some("12"));
        assert_eq!(parsed.target_user_id().expect("user id"), 7);
        assert_eq!(parsed.project_id().expect("project id"), Some(12));
    }

    #[test]
    fn missing_or_blank_project_is_none() {
        assert_eq!(params(Some("7"), None).project_id().expect("ok"), None);
        assert_eq!(params(Some("7"), Some(" ")).project_id().expect("ok"), None);
    }

    #[test]
    fn rejects_missing_and_malformed_user_id() {
        assert!(matches!(
            params(None, None).target_user_id(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            params(Some("seven"), None).target_user_id(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            params(Some("7"), Some("-1")).project_id(),
            Err(AppError::BadRequest(_))
        ));
    }
}
