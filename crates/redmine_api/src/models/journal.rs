use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::named_ref::NamedRef;
use crate::day_window::local_date_of;

/// Entry of an issue's change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<bool>,
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl Journal {
    pub fn author_id(&self) -> Option<u64> {
        self.user.as_ref().and_then(|user| user.id)
    }

    /// Local calendar date of `created_on`, if present and parseable.
    pub fn created_local_date(&self) -> Option<NaiveDate> {
        self.created_on.as_deref().and_then(local_date_of)
    }

    /// True when the entry was written by `user_id` on the local `date`.
    /// Entries lacking an author or a timestamp never match.
    pub fn authored_by_on(&self, user_id: u64, date: NaiveDate) -> bool {
        self.author_id() == Some(user_id) && self.created_local_date() == Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone, Utc};

    fn journal_at(user: Option<u64>, created_on: Option<String>) -> Journal {
        Journal {
            id: Some(1),
            user: user.map(|id| NamedRef::new(id, "someone")),
            notes: None,
            created_on,
            private_notes: None,
            details: Vec::new(),
        }
    }

    fn local_noon_utc(date: NaiveDate) -> String {
        let naive = date.and_hms_opt(12, 0, 0).expect("valid time");
        Local
            .from_local_datetime(&naive)
            .earliest()
            .expect("local noon exists")
            .with_timezone(&Utc)
            .to_rfc3339()
    }

    #[test]
    fn matches_author_and_local_day() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 21).expect("valid date");
        let journal = journal_at(Some(7), Some(local_noon_utc(day)));

        assert!(journal.authored_by_on(7, day));
        assert!(!journal.authored_by_on(8, day));
        assert!(!journal.authored_by_on(7, day.succ_opt().expect("next day")));
    }

    #[test]
    fn entries_without_author_or_timestamp_never_match() {
        let day = NaiveDate::from_ymd_opt(2025, 11, 21).expect("valid date");
        assert!(!journal_at(None, Some(local_noon_utc(day))).authored_by_on(7, day));
        assert!(!journal_at(Some(7), None).authored_by_on(7, day));
        assert!(!journal_at(Some(7), Some("garbage".into())).authored_by_on(7, day));
    }
}
