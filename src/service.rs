//! Glue between configuration and the Redmine lookups. A fresh client is
//! built per call so nothing carries over between requests.

use std::sync::Arc;

use log::{debug, info};
use redmine_api::{
    FilteredIssue, RedmineClient, TodaysUpdatesFetcher, UserDirectoryFetcher, UserProfile,
};

use crate::bridge::IssueParams;
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn client(&self) -> Result<RedmineClient, AppError> {
        let config = self.config.redmine_config()?;
        Ok(RedmineClient::new(config)?)
    }

    /// Issues `user_id` updated today, newest first.
    pub async fn todays_updates(
        &self,
        user_id: u64,
        project_id: Option<u64>,
    ) -> Result<Vec<FilteredIssue>, AppError> {
        let fetcher = TodaysUpdatesFetcher::new(self.client()?);
        let report = fetcher
            .find_todays_updates_report(user_id, project_id)
            .await?;

        if !report.dropped.is_empty() {
            info!(
                "{} of {} listed issues dropped for user {}",
                report.dropped.len(),
                report.listed,
                user_id
            );
            for dropped in &report.dropped {
                debug!("Dropped issue {}: {}", dropped.issue_id, dropped.reason);
            }
        }
        Ok(report.issues)
    }

    /// Validates the request parameters, then looks up today's updates.
    pub async fn issues_for(&self, params: &IssueParams) -> Result<Vec<FilteredIssue>, AppError> {
        let user_id = params.target_user_id()?;
        let project_id = params.project_id()?;
        self.todays_updates(user_id, project_id).await
    }

    /// Profiles of the configured staff users that resolved.
    pub async fn staff_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let client = self.client()?;
        let user_ids = self.config.staff_user_ids()?;
        let report = UserDirectoryFetcher::new(client)
            .fetch_profiles_report(&user_ids)
            .await;

        if !report.unresolved.is_empty() {
            info!("Unresolved staff users: {}", report.unresolved.join(", "));
        }
        Ok(report.profiles)
    }
}
