//! "Updated today by user X" lookup.
//!
//! The listing of issues touched inside the local day is paged sequentially,
//! then every listed issue is re-fetched with its journals through a
//! fixed-size worker pool. An issue is kept when one of its journal entries
//! was written by the target user on the current local date.
//!
//! A failed detail fetch never fails the lookup: the issue is recorded as
//! dropped and left out of the results. Callers that only look at
//! [`UpdatesReport::issues`] cannot tell "no match" from "dropped".

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::client::RedmineClient;
use crate::day_window::DayWindow;
use crate::error::{RedmineError, Result};
use crate::models::{FilteredIssue, IssueDetail, IssueListQuery, IssueSummary};
use crate::pool::drain_bounded;

pub const ISSUE_PAGE_LIMIT: u32 = 100;
pub const DETAIL_CONCURRENCY: usize = 5;

/// What became of one listed issue.
#[derive(Debug)]
pub enum DetailOutcome {
    Hit(FilteredIssue),
    Miss,
    Dropped(RedmineError),
}

/// Issue whose detail could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedIssue {
    pub issue_id: u64,
    pub reason: String,
}

#[derive(Debug)]
pub struct UpdatesReport {
    pub window: DayWindow,
    pub listed: usize,
    pub dropped: Vec<DroppedIssue>,
    pub issues: Vec<FilteredIssue>,
}

#[derive(Clone)]
pub struct TodaysUpdatesFetcher {
    client: RedmineClient,
    page_limit: u32,
    concurrency: usize,
}

impl TodaysUpdatesFetcher {
    pub fn new(client: RedmineClient) -> Self {
        Self {
            client,
            page_limit: ISSUE_PAGE_LIMIT,
            concurrency: DETAIL_CONCURRENCY,
        }
    }

    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    /// Issues updated today whose journals show an entry by `target_user_id`
    /// dated today, most recently updated first.
    pub async fn find_todays_updates(
        &self,
        target_user_id: u64,
        project_id: Option<u64>,
    ) -> Result<Vec<FilteredIssue>> {
        Ok(self
            .find_todays_updates_report(target_user_id, project_id)
            .await?
            .issues)
    }

    pub async fn find_todays_updates_report(
        &self,
        target_user_id: u64,
        project_id: Option<u64>,
    ) -> Result<UpdatesReport> {
        self.find_updates_in_window(DayWindow::current(), target_user_id, project_id)
            .await
    }

    /// Same lookup against an explicit day window.
    pub async fn find_updates_in_window(
        &self,
        window: DayWindow,
        target_user_id: u64,
        project_id: Option<u64>,
    ) -> Result<UpdatesReport> {
        let listed = self.list_updated_issues(&window, project_id).await?;
        let listed_count = listed.len();

        let completed = drain_bounded(listed, self.concurrency, |summary| {
            self.inspect_issue(summary, target_user_id, window)
        })
        .await;

        let mut hits = Vec::new();
        let mut dropped = Vec::new();
        for done in completed {
            match done.output {
                (_, DetailOutcome::Hit(issue)) => hits.push((done.index, issue)),
                (_, DetailOutcome::Miss) => {}
                (issue_id, DetailOutcome::Dropped(err)) => dropped.push((
                    done.index,
                    DroppedIssue {
                        issue_id,
                        reason: err.to_string(),
                    },
                )),
            }
        }
        dropped.sort_by_key(|(index, _)| *index);

        debug!(
            listed = listed_count,
            hits = hits.len(),
            dropped = dropped.len(),
            "finished journal scan for user {}",
            target_user_id
        );

        Ok(UpdatesReport {
            window,
            listed: listed_count,
            dropped: dropped.into_iter().map(|(_, issue)| issue).collect(),
            issues: sort_by_recent_update(hits),
        })
    }

    /// Pages through `/issues.json` for the window. Stops at `total_count` or
    /// on the first empty page, whichever comes first.
    pub async fn list_updated_issues(
        &self,
        window: &DayWindow,
        project_id: Option<u64>,
    ) -> Result<Vec<IssueSummary>> {
        let query = IssueListQuery::new(self.page_limit)
            .with_updated_on(window.updated_on_filter())
            .with_project(project_id);

        let mut offset: u64 = 0;
        let mut collected = Vec::new();
        loop {
            let page = self
                .client
                .list_issues(&query.at_offset(offset))
                .await
                .map_err(|err| RedmineError::listing(offset, err))?;

            let received = page.issues.len() as u64;
            collected.extend(page.issues);
            offset += received;
            debug!(
                "listed {} issues at offset {} of {}",
                received,
                offset - received,
                page.total_count
            );

            if received == 0 || offset >= page.total_count {
                break;
            }
        }
        Ok(collected)
    }

    async fn inspect_issue(
        &self,
        summary: IssueSummary,
        target_user_id: u64,
        window: DayWindow,
    ) -> (u64, DetailOutcome) {
        let outcome = match self.client.get_issue_with_journals(summary.id).await {
            Ok(detail) => {
                match classify_detail(detail, target_user_id, &window, |id| self.client.issue_url(id)) {
                    Some(issue) => DetailOutcome::Hit(issue),
                    None => DetailOutcome::Miss,
                }
            }
            Err(err) => {
                warn!("dropping issue {} after failed detail fetch: {}", summary.id, err);
                DetailOutcome::Dropped(err)
            }
        };
        (summary.id, outcome)
    }
}

/// Projects `detail` when one of its journals is by `target_user_id` on the window's day.
pub fn classify_detail<F>(
    detail: IssueDetail,
    target_user_id: u64,
    window: &DayWindow,
    issue_url: F,
) -> Option<FilteredIssue>
where
    F: FnOnce(u64) -> String,
{
    let hit = detail
        .journals
        .iter()
        .any(|journal| journal.authored_by_on(target_user_id, window.today));
    if !hit {
        return None;
    }
    let url = issue_url(detail.summary.id);
    Some(FilteredIssue::from_detail(detail, url))
}

/// Orders hits by `updated_on` descending. Equal or unparseable timestamps
/// keep listing order; issues without a parseable timestamp go last.
pub fn sort_by_recent_update(mut hits: Vec<(usize, FilteredIssue)>) -> Vec<FilteredIssue> {
    hits.sort_by(|(left_index, left), (right_index, right)| {
        match update_instant(right).cmp(&update_instant(left)) {
            Ordering::Equal => left_index.cmp(right_index),
            other => other,
        }
    });
    hits.into_iter().map(|(_, issue)| issue).collect()
}

fn update_instant(issue: &FilteredIssue) -> Option<DateTime<FixedOffset>> {
    issue
        .updated_on
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
}
