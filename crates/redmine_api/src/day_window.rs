//! Local calendar-day window used to select "today's" updates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open window `[today 00:00, tomorrow 00:00)` in the process's local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
}

impl DayWindow {
    /// Window for the current local date.
    pub fn current() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn for_date(today: NaiveDate) -> Self {
        let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
        Self { today, tomorrow }
    }

    pub fn today_key(&self) -> String {
        self.today.format(DATE_FORMAT).to_string()
    }

    pub fn tomorrow_key(&self) -> String {
        self.tomorrow.format(DATE_FORMAT).to_string()
    }

    /// Redmine range expression for `updated_on`.
    pub fn updated_on_filter(&self) -> String {
        format!("><{}|{}", self.today_key(), self.tomorrow_key())
    }

    /// True when the timestamp falls on `today` after conversion to local time.
    pub fn contains(&self, timestamp: &str) -> bool {
        local_date_of(timestamp) == Some(self.today)
    }
}

/// Parses a Redmine timestamp and returns its calendar date in local time.
///
/// Zoned timestamps (`2025-11-21T08:12:32Z`, `...+09:00`) are converted to the
/// local timezone before truncation; timestamps without a zone are read as
/// local wall-clock time.
pub fn local_date_of(value: &str) -> Option<NaiveDate> {
    parse_local_datetime(value.trim()).map(|dt| dt.date_naive())
}

fn parse_local_datetime(value: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Local))
        .or_else(|| {
            DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z")
                .ok()
                .map(|dt| dt.with_timezone(&Local))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        })
}
