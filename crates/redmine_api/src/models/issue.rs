use serde::{Deserialize, Serialize};

use super::journal::Journal;
use super::named_ref::NamedRef;

/// Issue as returned by the `/issues.json` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
}

/// Issue fetched with `include=journals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDetail {
    #[serde(flatten)]
    pub summary: IssueSummary,
    #[serde(default)]
    pub journals: Vec<Journal>,
}

/// One page of the issue listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePage {
    #[serde(default)]
    pub issues: Vec<IssueSummary>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IssueEnvelope {
    #[serde(default)]
    pub issue: Option<IssueDetail>,
}

/// Query parameters of a single `/issues.json` page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueListQuery {
    pub offset: u64,
    pub limit: u32,
    pub updated_on: Option<String>,
    pub project_id: Option<u64>,
}

impl IssueListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            offset: 0,
            limit,
            updated_on: None,
            project_id: None,
        }
    }

    pub fn with_updated_on(mut self, filter: impl Into<String>) -> Self {
        self.updated_on = Some(filter.into());
        self
    }

    pub fn with_project(mut self, project_id: Option<u64>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn at_offset(&self, offset: u64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("offset", self.offset.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(filter) = &self.updated_on {
            params.push(("updated_on", filter.clone()));
        }
        if let Some(project_id) = self.project_id {
            params.push(("project_id", project_id.to_string()));
        }
        params
    }
}

/// Issue updated today by the target user, in the shape served to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredIssue {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    pub url: String,
}

impl FilteredIssue {
    /// Projects an issue detail; `url` is the browsable issue page.
    pub fn from_detail(detail: IssueDetail, url: String) -> Self {
        let summary = detail.summary;
        let project_name = summary
            .project
            .as_ref()
            .map(|project| project.name_or_empty().to_string())
            .unwrap_or_default();
        Self {
            id: summary.id,
            subject: summary.subject,
            updated_on: summary.updated_on,
            project: summary.project,
            project_name,
            tracker: summary.tracker,
            status: summary.status,
            assigned_to: summary.assigned_to,
            author: summary.author,
            url,
        }
    }

    pub fn status_name(&self) -> &str {
        self.status
            .as_ref()
            .map(NamedRef::name_or_empty)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_parses_nested_journals() {
        let raw = json!({
            "id": 7,
            "subject": "Broken login",
            "updated_on": "2025-11-21T08:12:32Z",
            "project": {"id": 1, "name": "Web"},
            "journals": [
                {"id": 1, "user": {"id": 5, "name": "Ann"}, "created_on": "2025-11-21T08:12:32Z", "details": []},
                {"id": 2, "notes": "system"}
            ]
        });
        let detail: IssueDetail = serde_json::from_value(raw).expect("valid detail");
        assert_eq!(detail.summary.id, 7);
        assert_eq!(detail.journals.len(), 2);
        assert!(detail.journals[1].user.is_none());
    }

    #[test]
    fn projection_fills_project_name_and_url() {
        let detail: IssueDetail = serde_json::from_value(json!({
            "id": 9,
            "subject": "Ship it",
            "project": {"id": 2, "name": "Ops"},
            "status": {"id": 1, "name": "New"}
        }))
        .expect("valid detail");
        let issue = FilteredIssue::from_detail(detail, "https://r.example/issues/9".into());
        assert_eq!(issue.project_name, "Ops");
        assert_eq!(issue.status_name(), "New");

        let value = serde_json::to_value(&issue).expect("serializes");
        assert_eq!(value["url"], "https://r.example/issues/9");
        assert!(value.get("assigned_to").is_none());
    }

    #[test]
    fn projection_without_project_has_empty_name() {
        let detail: IssueDetail =
            serde_json::from_value(json!({"id": 10})).expect("valid detail");
        let issue = FilteredIssue::from_detail(detail, String::new());
        assert_eq!(issue.project_name, "");
        assert!(issue.project.is_none());
    }

    #[test]
    fn list_query_params_include_optional_filters_only_when_set() {
        let query = IssueListQuery::new(100);
        assert_eq!(
            query.to_params(),
            vec![("offset", "0".to_string()), ("limit", "100".to_string())]
        );

        let query = IssueListQuery::new(100)
            .with_updated_on("><2025-11-21|2025-11-22")
            .with_project(Some(4))
            .at_offset(200);
        let params = query.to_params();
        assert!(params.contains(&("offset", "200".to_string())));
        assert!(params.contains(&("updated_on", "><2025-11-21|2025-11-22".to_string())));
        assert!(params.contains(&("project_id", "4".to_string())));
    }

    #[test]
    fn empty_page_defaults() {
        let page: IssuePage = serde_json::from_value(json!({})).expect("valid page");
        assert!(page.issues.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
