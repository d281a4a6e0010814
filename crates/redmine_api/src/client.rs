use crate::config::{RedmineConfig, API_KEY_HEADER};
use crate::error::{RedmineError, Result};
use crate::models::{IssueDetail, IssueEnvelope, IssueListQuery, IssuePage, User, UserEnvelope};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Authenticated, read-only Redmine client bound to one tracker.
#[derive(Clone)]
pub struct RedmineClient {
    http: HttpClient,
    config: RedmineConfig,
}

impl RedmineClient {
    /// Validates `config` and builds the underlying HTTP client. Fails before
    /// any request is made when the base URL or API key is missing.
    pub fn new(config: RedmineConfig) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RedmineConfig {
        &self.config
    }

    pub fn issue_url(&self, issue_id: u64) -> String {
        self.config.issue_url(issue_id)
    }

    pub async fn get_with_query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let mut request = self.http.get(self.url_for(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.get_with_query(path, &[]).await
    }

    /// One page of `/issues.json`.
    pub async fn list_issues(&self, query: &IssueListQuery) -> Result<IssuePage> {
        self.get_with_query("issues.json", &query.to_params()).await
    }

    /// Full issue including its journal history.
    pub async fn get_issue_with_journals(&self, issue_id: u64) -> Result<IssueDetail> {
        let path = format!("issues/{}.json", issue_id);
        let envelope: IssueEnvelope = self
            .get_with_query(&path, &[("include", "journals".to_string())])
            .await?;
        envelope
            .issue
            .ok_or_else(|| RedmineError::MissingPayload(format!("issue {} has no body", issue_id)))
    }

    /// Looks up a user; `None` when the server answers with an empty body or no `user` object.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let path = format!("users/{}.json", user_id.trim());
        let envelope: UserEnvelope = self.get(&path).await?;
        Ok(envelope.user)
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_root(),
            path.trim_start_matches('/')
        )
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            if body.trim().is_empty() {
                return Ok(T::default());
            }
            serde_json::from_str(&body).map_err(RedmineError::from)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(RedmineError::Authentication(format!(
                "Access denied ({}) - {}",
                status, body
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(build_http_error(status, &body))
        }
    }
}

fn build_http_client(config: &RedmineConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let key_header = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
        .map_err(|err| RedmineError::Other(err.to_string()))?;
    let mut key_value = header_value(config.api_key.clone())?;
    key_value.set_sensitive(true);
    headers.insert(key_header, key_value);

    if let Some(auth) = &config.basic_auth {
        let mut auth_value = header_value(auth.header_value())?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
    }

    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| RedmineError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value)
        .map_err(|err| RedmineError::Configuration(format!("invalid header value: {}", err)))
}

fn build_http_error(status: StatusCode, body: &str) -> RedmineError {
    let message = extract_error_messages(body).unwrap_or_else(|| body.to_string());
    RedmineError::http(status, message)
}

/// Redmine reports validation and lookup failures as `{"errors": ["..."]}`.
fn extract_error_messages(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let messages: Vec<&str> = value
        .get("errors")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
