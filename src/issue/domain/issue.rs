//! Issue aggregate root and related attribute types.

use super::{
    Comment, ConcurrencyToken, IssueDomainError, IssueIdentifier, IssueLink, IssueState,
    IssueView, LinkType, Maintainer, StateChangeCommand, TriageUser,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Issue priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    #[default]
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(IssueDomainError::InvalidPriority(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work an issue represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Grouping parent for other issues.
    Epic,
    /// User-facing feature.
    Story,
    /// Unit of technical work.
    Task,
    /// Reported fault.
    #[default]
    Defect,
}

impl IssueType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Task => "task",
            Self::Defect => "defect",
        }
    }
}

impl TryFrom<&str> for IssueType {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "epic" => Ok(Self::Epic),
            "story" => Ok(Self::Story),
            "task" => Ok(Self::Task),
            "defect" => Ok(Self::Defect),
            _ => Err(IssueDomainError::InvalidIssueType(value.to_owned())),
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue aggregate root.
///
/// All mutation goes through [`Issue::execute`] or the validating setters.
/// Every successful mutation regenerates the concurrency token; rejected
/// commands and setters that leave a value unchanged do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    id: IssueIdentifier,
    title: String,
    description: String,
    priority: Priority,
    issue_type: IssueType,
    epic_id: Option<IssueIdentifier>,
    reporter: TriageUser,
    assignee: Maintainer,
    state: IssueState,
    start_time: Option<DateTime<Utc>>,
    stop_time: Option<DateTime<Utc>>,
    related_to: BTreeSet<IssueLink>,
    related_from: BTreeSet<IssueLink>,
    comments: Vec<Comment>,
    concurrency_token: ConcurrencyToken,
}

/// Parameter object for reconstructing a persisted issue aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted identifier.
    pub id: IssueIdentifier,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted issue type.
    pub issue_type: IssueType,
    /// Persisted parent epic, if any.
    pub epic_id: Option<IssueIdentifier>,
    /// Persisted reporter.
    pub reporter: TriageUser,
    /// Persisted assignee.
    pub assignee: Maintainer,
    /// Persisted lifecycle state.
    pub state: IssueState,
    /// Persisted start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Persisted stop time.
    pub stop_time: Option<DateTime<Utc>>,
    /// Persisted outgoing links.
    pub related_to: Vec<IssueLink>,
    /// Persisted incoming links.
    pub related_from: Vec<IssueLink>,
    /// Persisted comments.
    pub comments: Vec<Comment>,
    /// Persisted concurrency token.
    pub concurrency_token: ConcurrencyToken,
}

impl Issue {
    /// Creates a new issue in the `Backlog` state.
    ///
    /// The project code is upper-cased, and surrounding whitespace is
    /// trimmed from the title and description before their length limits
    /// are checked.
    ///
    /// # Errors
    ///
    /// Returns an [`IssueDomainError`] when the project code or issue number
    /// is invalid, the title is blank or longer than [`MAX_TITLE_LENGTH`], or
    /// the description is longer than [`MAX_DESCRIPTION_LENGTH`].
    pub fn new(
        project: &str,
        issue_number: i64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, IssueDomainError> {
        let id = IssueIdentifier::from_parts(project, issue_number)?;
        Self::with_identifier(id, title, description)
    }

    /// Creates a new issue in the `Backlog` state from an existing
    /// identifier.
    ///
    /// Title and description are trimmed as in [`Self::new`].
    ///
    /// # Errors
    ///
    /// Returns an [`IssueDomainError`] when the title or description is
    /// invalid.
    pub fn with_identifier(
        id: IssueIdentifier,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, IssueDomainError> {
        Ok(Self {
            id,
            title: validated_title(title)?,
            description: validated_description(description)?,
            priority: Priority::default(),
            issue_type: IssueType::default(),
            epic_id: None,
            reporter: TriageUser::unassigned(),
            assignee: Maintainer::unassigned(),
            state: IssueState::Backlog,
            start_time: None,
            stop_time: None,
            related_to: BTreeSet::new(),
            related_from: BTreeSet::new(),
            comments: Vec::new(),
            concurrency_token: ConcurrencyToken::new(),
        })
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            issue_type: data.issue_type,
            epic_id: data.epic_id,
            reporter: data.reporter,
            assignee: data.assignee,
            state: data.state,
            start_time: data.start_time,
            stop_time: data.stop_time,
            related_to: data.related_to.into_iter().collect(),
            related_from: data.related_from.into_iter().collect(),
            comments: data.comments,
            concurrency_token: data.concurrency_token,
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> &IssueIdentifier {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the issue type.
    #[must_use]
    pub const fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    /// Returns the parent epic, if any.
    #[must_use]
    pub const fn epic_id(&self) -> Option<&IssueIdentifier> {
        self.epic_id.as_ref()
    }

    /// Returns the reporter.
    #[must_use]
    pub const fn reporter(&self) -> &TriageUser {
        &self.reporter
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &Maintainer {
        &self.assignee
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> IssueState {
        self.state
    }

    /// Returns when work first started, if it has.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns when work last stopped, if it has.
    #[must_use]
    pub const fn stop_time(&self) -> Option<DateTime<Utc>> {
        self.stop_time
    }

    /// Returns the comments in insertion order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the current concurrency token.
    #[must_use]
    pub const fn concurrency_token(&self) -> ConcurrencyToken {
        self.concurrency_token
    }

    /// Returns whether `command` is legal in the current state.
    ///
    /// A command whose stop time is earlier than the recorded start time is
    /// never legal.
    #[must_use]
    pub fn can_execute(&self, command: &StateChangeCommand) -> bool {
        self.state.can_execute(command) && !self.stops_before_start(command)
    }

    /// Executes a lifecycle command.
    ///
    /// Returns `true` when the command moved the issue to a new state. A
    /// command that is not legal in the current state, or that would stop
    /// work before it started, leaves the issue untouched, including its
    /// concurrency token, and returns `false`.
    pub fn execute(&mut self, command: &StateChangeCommand) -> bool {
        if self.stops_before_start(command) {
            return false;
        }
        let Some(next_state) = self.state.transition(command) else {
            return false;
        };

        self.state = next_state;
        self.record_work_times(command);
        self.touch();
        true
    }

    /// Replaces the title with its trimmed form.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyTitle`] or
    /// [`IssueDomainError::TitleTooLong`] when the title is invalid.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), IssueDomainError> {
        let validated = validated_title(title)?;
        if validated != self.title {
            self.title = validated;
            self.touch();
        }
        Ok(())
    }

    /// Replaces the description with its trimmed form.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::DescriptionTooLong`] when the description
    /// exceeds [`MAX_DESCRIPTION_LENGTH`] characters.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), IssueDomainError> {
        let validated = validated_description(description)?;
        if validated != self.description {
            self.description = validated;
            self.touch();
        }
        Ok(())
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: Priority) {
        if priority != self.priority {
            self.priority = priority;
            self.touch();
        }
    }

    /// Replaces the issue type.
    ///
    /// Changing the type to [`IssueType::Epic`] clears any parent epic.
    pub fn set_type(&mut self, issue_type: IssueType) {
        let clears_epic = issue_type == IssueType::Epic && self.epic_id.is_some();
        if issue_type == self.issue_type && !clears_epic {
            return;
        }
        if clears_epic {
            self.epic_id = None;
        }
        self.issue_type = issue_type;
        self.touch();
    }

    /// Replaces the parent epic.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EpicOnEpic`] when assigning a parent to an
    /// issue whose type is [`IssueType::Epic`].
    pub fn set_epic_id(
        &mut self,
        epic_id: Option<IssueIdentifier>,
    ) -> Result<(), IssueDomainError> {
        if let Some(parent) = epic_id.as_ref()
            && self.issue_type == IssueType::Epic
        {
            return Err(IssueDomainError::EpicOnEpic(parent.clone()));
        }
        if epic_id != self.epic_id {
            self.epic_id = epic_id;
            self.touch();
        }
        Ok(())
    }

    /// Replaces the reporter.
    pub fn set_reporter(&mut self, reporter: TriageUser) {
        if reporter != self.reporter {
            self.reporter = reporter;
            self.touch();
        }
    }

    /// Replaces the assignee.
    pub fn set_assignee(&mut self, assignee: Maintainer) {
        if assignee != self.assignee {
            self.assignee = assignee;
            self.touch();
        }
    }

    /// Appends a comment.
    ///
    /// # Errors
    ///
    /// Returns an [`IssueDomainError`] when the comment content is invalid.
    pub fn add_comment(
        &mut self,
        author: TriageUser,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<(), IssueDomainError> {
        let comment = Comment::new(author, content, created_at)?;
        self.comments.push(comment);
        self.touch();
        Ok(())
    }

    /// Records an outgoing link from this issue to `target`.
    ///
    /// Only this end of the edge is recorded; use [`link_issues`] to update
    /// both aggregates. Returns `false` when the link already exists.
    pub fn add_related_to(&mut self, link_type: LinkType, target: &Self) -> bool {
        self.insert_related_to(link_type, target.id.clone())
    }

    /// Records an incoming link from `source` to this issue.
    ///
    /// Returns `false` when the link already exists.
    pub fn add_related_from(&mut self, link_type: LinkType, source: &Self) -> bool {
        self.insert_related_from(link_type, source.id.clone())
    }

    /// Returns outgoing links.
    #[must_use]
    pub fn related_to(&self) -> impl Iterator<Item = &IssueLink> {
        self.related_to.iter()
    }

    /// Returns incoming links.
    #[must_use]
    pub fn related_from(&self) -> impl Iterator<Item = &IssueLink> {
        self.related_from.iter()
    }

    /// Returns every issue this one is linked with, in either direction.
    #[must_use]
    pub fn related_issues(&self) -> BTreeSet<IssueIdentifier> {
        self.related_to
            .iter()
            .map(|link| link.right().clone())
            .chain(self.related_from.iter().map(|link| link.left().clone()))
            .collect()
    }

    /// Records on `counterpart` the far end of every link this issue holds
    /// with it.
    ///
    /// Used after building an issue with staged links, once the linked
    /// issues have been loaded. Returns `true` when anything was recorded.
    pub fn reciprocate_links(&self, counterpart: &mut Self) -> bool {
        let counterpart_id = counterpart.id.clone();
        let mut recorded = false;
        for link in self.related_to.iter().filter(|link| link.right() == &counterpart_id) {
            recorded |= counterpart.insert_related_from(link.link_type(), self.id.clone());
        }
        for link in self.related_from.iter().filter(|link| link.left() == &counterpart_id) {
            recorded |= counterpart.insert_related_to(link.link_type(), self.id.clone());
        }
        recorded
    }

    /// Returns the read-only projection exposed to transport layers.
    #[must_use]
    pub fn view(&self) -> IssueView {
        IssueView::from_issue(self)
    }

    pub(super) fn insert_related_to(
        &mut self,
        link_type: LinkType,
        target: IssueIdentifier,
    ) -> bool {
        let inserted = self
            .related_to
            .insert(IssueLink::new(link_type, self.id.clone(), target));
        if inserted {
            self.touch();
        }
        inserted
    }

    pub(super) fn insert_related_from(
        &mut self,
        link_type: LinkType,
        source: IssueIdentifier,
    ) -> bool {
        let inserted = self
            .related_from
            .insert(IssueLink::new(link_type, source, self.id.clone()));
        if inserted {
            self.touch();
        }
        inserted
    }

    /// Stamps start and stop times for an accepted command.
    fn record_work_times(&mut self, command: &StateChangeCommand) {
        if let StateChangeCommand::Open { started_at } = command {
            if self.start_time.is_none() {
                self.start_time = Some(*started_at);
            }
            self.stop_time = None;
        } else if let Some(stopped_at) = command.stopped_at() {
            self.stop_time = Some(stopped_at);
        }
    }

    fn stops_before_start(&self, command: &StateChangeCommand) -> bool {
        matches!(
            (self.start_time, command.stopped_at()),
            (Some(started), Some(stopped)) if stopped < started
        )
    }

    fn touch(&mut self) {
        self.concurrency_token = ConcurrencyToken::new();
    }
}

/// Links `left` to `right`, recording the edge on both aggregates.
///
/// Returns `true` when either end was newly recorded.
pub fn link_issues(link_type: LinkType, left: &mut Issue, right: &mut Issue) -> bool {
    let outgoing = left.add_related_to(link_type, right);
    let incoming = right.add_related_from(link_type, left);
    outgoing || incoming
}

pub(super) fn validated_title(title: impl Into<String>) -> Result<String, IssueDomainError> {
    let raw = title.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(IssueDomainError::EmptyTitle);
    }
    let length = normalized.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(IssueDomainError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
            length,
        });
    }
    Ok(normalized.to_owned())
}

pub(super) fn validated_description(
    description: impl Into<String>,
) -> Result<String, IssueDomainError> {
    let raw = description.into();
    let normalized = raw.trim();
    let length = normalized.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(IssueDomainError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LENGTH,
            length,
        });
    }
    Ok(normalized.to_owned())
}
