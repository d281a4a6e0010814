//! Staff directory lookups.
//!
//! Every configured user is requested at once, without a concurrency cap.
//! Users that fail to resolve are left out of the profile list; the report
//! form also names them so callers can tell which ids were lost.

use tracing::warn;

use crate::client::RedmineClient;
use crate::error::{RedmineError, Result};
use crate::models::UserProfile;
use crate::pool::map_concurrent;

/// Splits a comma-separated id list, trimming entries and discarding blanks.
pub fn parse_user_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    pub profiles: Vec<UserProfile>,
    pub unresolved: Vec<String>,
}

#[derive(Clone)]
pub struct UserDirectoryFetcher {
    client: RedmineClient,
}

impl UserDirectoryFetcher {
    pub fn new(client: RedmineClient) -> Self {
        Self { client }
    }

    /// Profiles for a comma-separated id list. An empty or blank list is a
    /// configuration error.
    pub async fn fetch_staff_profiles(&self, raw_ids: &str) -> Result<Vec<UserProfile>> {
        let user_ids = parse_user_ids(raw_ids);
        if user_ids.is_empty() {
            return Err(RedmineError::Configuration(
                "staff user id list is empty".to_string(),
            ));
        }
        Ok(self.fetch_profiles(&user_ids).await)
    }

    /// Profiles of the users that resolved, in input order.
    pub async fn fetch_profiles<S: AsRef<str>>(&self, user_ids: &[S]) -> Vec<UserProfile> {
        self.fetch_profiles_report(user_ids).await.profiles
    }

    pub async fn fetch_profiles_report<S: AsRef<str>>(&self, user_ids: &[S]) -> DirectoryReport {
        let ids: Vec<&str> = user_ids
            .iter()
            .map(|id| id.as_ref().trim())
            .filter(|id| !id.is_empty())
            .collect();

        let lookups = map_concurrent(ids, |user_id| async move {
            (user_id, self.fetch_profile(user_id).await)
        })
        .await;

        let mut profiles = Vec::with_capacity(lookups.len());
        let mut unresolved = Vec::new();
        for (user_id, profile) in lookups {
            match profile {
                Some(profile) => profiles.push(profile),
                None => unresolved.push(user_id.to_string()),
            }
        }
        DirectoryReport {
            profiles,
            unresolved,
        }
    }

    async fn fetch_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.client.get_user(user_id).await {
            Ok(Some(user)) => Some(UserProfile::from(user)),
            Ok(None) => {
                warn!("user {} returned no record", user_id);
                None
            }
            Err(err) => {
                warn!("failed to fetch user {}: {}", user_id, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedmineConfig;
    use mockito::{Matcher, ServerGuard};
    use serde_json::json;

    fn fetcher_for(server: &ServerGuard) -> UserDirectoryFetcher {
        let client =
            RedmineClient::new(RedmineConfig::new(server.url(), "secret-key")).expect("valid config");
        UserDirectoryFetcher::new(client)
    }

    async fn mock_user(server: &mut ServerGuard, id: u64, login: &str) -> mockito::Mock {
        server
            .mock("GET", format!("/users/{}.json", id).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"user": {"id": id, "firstname": "First", "lastname": "Last", "login": login, "mail": "x@example.com"}})
                    .to_string(),
            )
            .create_async()
            .await
    }

    #[test]
    fn parses_trailing_separators_and_spaces() {
        assert_eq!(parse_user_ids("1, 2, "), vec!["1", "2"]);
        assert_eq!(parse_user_ids(" ,, 5 ,"), vec!["5"]);
        assert!(parse_user_ids("").is_empty());
    }

    #[tokio::test]
    async fn failing_user_is_left_out() {
        let mut server = mockito::Server::new_async().await;
        mock_user(&mut server, 1, "first").await;
        server
            .mock("GET", "/users/2.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let profiles = fetcher
            .fetch_staff_profiles("1, 2, ")
            .await
            .expect("lookup succeeds");

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id, 1);
        assert_eq!(profiles[0].login, "first");
    }

    #[tokio::test]
    async fn report_names_unresolved_ids_and_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        mock_user(&mut server, 3, "third").await;
        mock_user(&mut server, 1, "first").await;
        server
            .mock("GET", "/users/8.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let report = fetcher.fetch_profiles_report(&["3", "8", "1"]).await;

        let logins: Vec<&str> = report.profiles.iter().map(|p| p.login.as_str()).collect();
        assert_eq!(logins, vec!["third", "first"]);
        assert_eq!(report.unresolved, vec!["8".to_string()]);
    }

    #[tokio::test]
    async fn blank_id_list_is_a_configuration_error() {
        let server = mockito::Server::new_async().await;
        let fetcher = fetcher_for(&server);
        for raw in ["", "  ", " , , "] {
            let err = fetcher.fetch_staff_profiles(raw).await.unwrap_err();
            assert!(err.is_configuration(), "{:?} should be rejected", raw);
        }
    }
}
