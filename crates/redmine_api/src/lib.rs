//! Typed, read-only Redmine API client and the issue/user lookups built on it.

pub mod client;
pub mod config;
pub mod day_window;
pub mod directory;
pub mod error;
pub mod models;
pub mod pool;
pub mod updates;

pub use client::RedmineClient;
pub use config::{BasicAuth, RedmineConfig};
pub use day_window::DayWindow;
pub use directory::{parse_user_ids, DirectoryReport, UserDirectoryFetcher};
pub use error::{RedmineError, Result};
pub use models::{
    FilteredIssue, IssueDetail, IssueListQuery, IssuePage, IssueSummary, Journal, JournalDetail,
    NamedRef, User, UserProfile,
};
pub use updates::{DetailOutcome, DroppedIssue, TodaysUpdatesFetcher, UpdatesReport};
