mod issue;
mod journal;
mod named_ref;
mod user;

pub use issue::{FilteredIssue, IssueDetail, IssueListQuery, IssuePage, IssueSummary};
pub use journal::{Journal, JournalDetail};
pub use named_ref::NamedRef;
pub use user::{User, UserProfile};

pub(crate) use issue::IssueEnvelope;
pub(crate) use user::UserEnvelope;
