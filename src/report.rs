//! Plain-text rendering for the CLI and log-safe error summaries.

use redmine_api::{FilteredIssue, UserProfile};

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_text(value: &str, limit: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() <= limit {
        return trimmed.to_string();
    }
    if limit <= 1 {
        return "…".to_string();
    }
    let mut truncated: String = trimmed.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}

/// Shortens an error message for logs and hides it entirely when it looks
/// like it carries credentials.
pub fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    let lowered = collapsed.to_lowercase();
    let has_sensitive_hint = ["api-key", "api_key", "authorization", "basic ", "password"]
        .iter()
        .any(|hint| lowered.contains(hint));

    if has_sensitive_hint {
        return format!(
            "{}: <redacted-sensitive-details>",
            truncate_text(category, 64)
        );
    }

    truncate_text(&collapsed, 180)
}

/// `#id [project] [status] subject (url)`
pub fn format_issue_line(issue: &FilteredIssue) -> String {
    format!(
        "#{} [{}] [{}] {} ({})",
        issue.id,
        issue.project_name,
        issue.status_name(),
        issue.subject.as_deref().unwrap_or_default(),
        issue.url
    )
}

pub fn format_user_line(user: &UserProfile) -> String {
    format!(
        "  - ID: {}, name: {}, login: {}",
        user.id,
        user.display_name(),
        user.login
    )
}

pub fn render_issues(user_id: u64, issues: &[FilteredIssue]) -> String {
    let mut out = format!(
        "Found {} issues updated today by user {}\n",
        issues.len(),
        user_id
    );
    for issue in issues {
        out.push_str(&format_issue_line(issue));
        out.push('\n');
    }
    out
}

pub fn render_users(users: &[UserProfile]) -> String {
    let mut out = format!("Fetched {} users\n", users.len());
    for user in users {
        out.push_str(&format_user_line(user));
        out.push('\n');
    }
    out
}
