//! Staged construction of [`Issue`] aggregates.

use super::issue::{validated_description, validated_title};
use super::{
    Issue, IssueDomainError, IssueIdentifier, IssueType, LinkType, Maintainer, Priority,
    TriageUser,
};

/// Reusable builder that validates required fields on [`IssueBuilder::build`].
///
/// An identity is supplied either as a complete [`IssueIdentifier`] or as a
/// project code plus issue number, never both. [`IssueBuilder::build`]
/// records staged links on the built issue only;
/// [`IssueBuilder::build_linked`] also records the other end on each linked
/// issue.
#[derive(Debug, Clone, Default)]
pub struct IssueBuilder {
    id: Option<IssueIdentifier>,
    project: Option<String>,
    issue_number: Option<i64>,
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    issue_type: Option<IssueType>,
    epic_id: Option<IssueIdentifier>,
    reporter: Option<TriageUser>,
    assignee: Option<Maintainer>,
    related_to: Vec<(LinkType, IssueIdentifier)>,
    related_from: Vec<(LinkType, IssueIdentifier)>,
}

impl IssueBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a complete identifier.
    #[must_use]
    pub fn with_id(mut self, id: IssueIdentifier) -> Self {
        self.id = Some(id);
        self
    }

    /// Stages the project code half of the identity.
    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Stages the issue number half of the identity.
    #[must_use]
    pub const fn with_issue_number(mut self, issue_number: i64) -> Self {
        self.issue_number = Some(issue_number);
        self
    }

    /// Stages the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stages the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Stages the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Stages the issue type.
    #[must_use]
    pub const fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = Some(issue_type);
        self
    }

    /// Stages the parent epic.
    #[must_use]
    pub fn with_epic(mut self, epic_id: IssueIdentifier) -> Self {
        self.epic_id = Some(epic_id);
        self
    }

    /// Stages the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: TriageUser) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Stages the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Maintainer) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Stages an outgoing link to `target`.
    #[must_use]
    pub fn with_related_to(mut self, link_type: LinkType, target: &Issue) -> Self {
        self.related_to.push((link_type, target.id().clone()));
        self
    }

    /// Stages an incoming link from `source`.
    #[must_use]
    pub fn with_related_from(mut self, link_type: LinkType, source: &Issue) -> Self {
        self.related_from.push((link_type, source.id().clone()));
        self
    }

    /// Clears every staged field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Checks every staged field that does not depend on the identity.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::MissingDescription`] when a required text field is
    /// absent or blank, a length error when either exceeds its limit, and
    /// [`IssueDomainError::EpicOnEpic`] when an epic is given a parent epic.
    pub fn validate(&self) -> Result<(), IssueDomainError> {
        self.validated_text()?;
        match (self.issue_type, &self.epic_id) {
            (Some(IssueType::Epic), Some(epic_id)) => {
                Err(IssueDomainError::EpicOnEpic(epic_id.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Validates the staged fields and builds an issue in the `Backlog`
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::ConflictingIdentity`] when both an
    /// identifier and a project or issue number are staged,
    /// [`IssueDomainError::MissingIdentity`] when neither form is complete,
    /// and any error reported by [`Self::validate`].
    pub fn build(&self) -> Result<Issue, IssueDomainError> {
        let id = self.identity()?;
        let (title, description) = self.validated_text()?;

        let mut issue = Issue::with_identifier(id, title, description)?;
        if let Some(priority) = self.priority {
            issue.set_priority(priority);
        }
        if let Some(issue_type) = self.issue_type {
            issue.set_type(issue_type);
        }
        if let Some(epic_id) = self.epic_id.clone() {
            issue.set_epic_id(Some(epic_id))?;
        }
        if let Some(reporter) = self.reporter.clone() {
            issue.set_reporter(reporter);
        }
        if let Some(assignee) = self.assignee.clone() {
            issue.set_assignee(assignee);
        }
        for (link_type, target) in &self.related_to {
            issue.insert_related_to(*link_type, target.clone());
        }
        for (link_type, source) in &self.related_from {
            issue.insert_related_from(*link_type, source.clone());
        }
        Ok(issue)
    }

    /// Builds an issue and records the far end of every staged link on the
    /// matching issue in `counterparts`.
    ///
    /// Nothing in `counterparts` is modified unless every linked issue is
    /// present. A link that names the built issue itself is recorded at
    /// both ends on the built issue.
    ///
    /// # Errors
    ///
    /// Returns any error reported by [`Self::build`], or
    /// [`IssueDomainError::MissingLinkedIssue`] when a staged link names an
    /// issue absent from `counterparts`.
    pub fn build_linked(
        &self,
        counterparts: &mut [&mut Issue],
    ) -> Result<Issue, IssueDomainError> {
        let mut issue = self.build()?;
        let missing = self
            .related_to
            .iter()
            .chain(&self.related_from)
            .map(|(_, linked)| linked)
            .find(|linked| {
                *linked != issue.id() && !counterparts.iter().any(|other| other.id() == *linked)
            });
        if let Some(linked) = missing {
            return Err(IssueDomainError::MissingLinkedIssue(linked.clone()));
        }

        for (link_type, target_id) in &self.related_to {
            if target_id == issue.id() {
                let own_id = issue.id().clone();
                issue.insert_related_from(*link_type, own_id);
            } else if let Some(target) =
                counterparts.iter_mut().find(|other| other.id() == target_id)
            {
                target.add_related_from(*link_type, &issue);
            }
        }
        for (link_type, source_id) in &self.related_from {
            if source_id == issue.id() {
                let own_id = issue.id().clone();
                issue.insert_related_to(*link_type, own_id);
            } else if let Some(source) =
                counterparts.iter_mut().find(|other| other.id() == source_id)
            {
                source.add_related_to(*link_type, &issue);
            }
        }
        Ok(issue)
    }

    fn validated_text(&self) -> Result<(String, String), IssueDomainError> {
        let title = validated_title(self.title.as_deref().unwrap_or_default())?;
        let description = validated_description(self.description.as_deref().unwrap_or_default())?;
        if description.is_empty() {
            return Err(IssueDomainError::MissingDescription);
        }
        Ok((title, description))
    }

    fn identity(&self) -> Result<IssueIdentifier, IssueDomainError> {
        match (&self.id, self.project.as_deref(), self.issue_number) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                Err(IssueDomainError::ConflictingIdentity)
            }
            (Some(id), None, None) => Ok(id.clone()),
            (None, Some(project), Some(number)) => IssueIdentifier::from_parts(project, number),
            (None, _, _) => Err(IssueDomainError::MissingIdentity),
        }
    }
}
