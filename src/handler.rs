//! Serverless entry point for API-gateway style events.

use std::collections::{BTreeMap, HashMap};

use log::error;
use serde::{Deserialize, Serialize};

use crate::bridge::{ErrorBody, IssueParams};
use crate::error::AppError;
use crate::report::redact_log_details;
use crate::service::AppState;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub raw_path: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl GatewayEvent {
    fn route_path(&self) -> &str {
        self.raw_path
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or_default()
    }

    fn query(&self, key: &str) -> Option<String> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key).cloned())
    }

    fn issue_params(&self) -> IssueParams {
        IssueParams {
            user_id: self.query("user_id"),
            project_id: self.query("project_id"),
        }
    }

    fn wants_users(&self) -> bool {
        self.route_path().trim_end_matches('/').ends_with("/users")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl GatewayResponse {
    fn json(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body,
        }
    }
}

pub async fn handle_event(state: &AppState, event: GatewayEvent) -> GatewayResponse {
    let body = if event.wants_users() {
        state.staff_profiles().await.and_then(to_body)
    } else {
        state.issues_for(&event.issue_params()).await.and_then(to_body)
    };

    match body {
        Ok(body) => GatewayResponse::json(200, body),
        Err(err) => {
            error!("Handler failed: {}", redact_log_details(&err.to_string()));
            let payload = serde_json::to_string(&ErrorBody::from(&err))
                .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
            GatewayResponse::json(err.status().as_u16(), payload)
        }
    }
}

fn to_body<T: Serialize>(value: T) -> Result<String, AppError> {
    serde_json::to_string(&value).map_err(|err| AppError::Redmine(err.into()))
}
