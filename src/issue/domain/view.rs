//! Read-only projection of an issue for transport layers.

use super::{Issue, Maintainer, TriageUser};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Identity of a reporter or assignee as seen by transport layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    /// User identifier.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
}

impl From<&TriageUser> for UserView {
    fn from(user: &TriageUser) -> Self {
        Self {
            id: user.id(),
            full_name: user.full_name().to_owned(),
        }
    }
}

impl From<&Maintainer> for UserView {
    fn from(user: &Maintainer) -> Self {
        Self {
            id: user.id(),
            full_name: user.full_name().to_owned(),
        }
    }
}

/// Flat snapshot of the fields an issue exposes outside the domain.
///
/// Links appear only as the identifiers of related issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueView {
    /// Identifier in `PROJECT-NUMBER` form.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority name.
    pub priority: &'static str,
    /// Issue type name.
    #[serde(rename = "type")]
    pub issue_type: &'static str,
    /// Parent epic identifier, if any.
    pub epic_id: Option<String>,
    /// Reporter identity.
    pub reporter: UserView,
    /// Assignee identity.
    pub assignee: UserView,
    /// Lifecycle state name.
    pub state: &'static str,
    /// When work first started.
    pub start_time: Option<DateTime<Utc>>,
    /// When work last stopped.
    pub stop_time: Option<DateTime<Utc>>,
    /// Identifiers of linked issues in either direction.
    pub related_issues: Vec<String>,
    /// Number of comments.
    pub comment_count: usize,
    /// Current concurrency token.
    pub concurrency_token: String,
}

impl IssueView {
    pub(super) fn from_issue(issue: &Issue) -> Self {
        Self {
            id: issue.id().to_string(),
            title: issue.title().to_owned(),
            description: issue.description().to_owned(),
            priority: issue.priority().as_str(),
            issue_type: issue.issue_type().as_str(),
            epic_id: issue.epic_id().map(ToString::to_string),
            reporter: UserView::from(issue.reporter()),
            assignee: UserView::from(issue.assignee()),
            state: issue.state().as_str(),
            start_time: issue.start_time(),
            stop_time: issue.stop_time(),
            related_issues: issue
                .related_issues()
                .iter()
                .map(ToString::to_string)
                .collect(),
            comment_count: issue.comments().len(),
            concurrency_token: issue.concurrency_token().to_string(),
        }
    }
}
