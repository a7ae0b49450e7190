//! Command dispatch for issue creation, lifecycle changes, and linking.

use super::IssueServiceConfig;
use crate::issue::{
    domain::{
        CommandKind, ConcurrencyToken, Issue, IssueBuilder, IssueDomainError, IssueIdentifier,
        IssueNumber, IssueState, IssueType, LinkType, Maintainer, Priority, ProjectCode,
        StateChangeCommand, TriageUser, link_issues,
    },
    ports::{IssueRepository, IssueRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    project: String,
    issue_number: Option<i64>,
    title: String,
    description: String,
    priority: Option<Priority>,
    issue_type: Option<IssueType>,
    epic_id: Option<IssueIdentifier>,
    reporter: Option<TriageUser>,
    assignee: Option<Maintainer>,
    related_to: Vec<(LinkType, IssueIdentifier)>,
    related_from: Vec<(LinkType, IssueIdentifier)>,
}

impl CreateIssueRequest {
    /// Creates a request with the required issue fields.
    ///
    /// The issue number is assigned by the repository unless
    /// [`Self::with_issue_number`] is used.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            issue_number: None,
            title: title.into(),
            description: description.into(),
            priority: None,
            issue_type: None,
            epic_id: None,
            reporter: None,
            assignee: None,
            related_to: Vec::new(),
            related_from: Vec::new(),
        }
    }

    /// Sets an explicit issue number.
    #[must_use]
    pub const fn with_issue_number(mut self, issue_number: i64) -> Self {
        self.issue_number = Some(issue_number);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the issue type.
    #[must_use]
    pub const fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = Some(issue_type);
        self
    }

    /// Sets the parent epic.
    #[must_use]
    pub fn with_epic(mut self, epic_id: IssueIdentifier) -> Self {
        self.epic_id = Some(epic_id);
        self
    }

    /// Sets the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: TriageUser) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Maintainer) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Adds an outgoing link to an existing issue.
    #[must_use]
    pub fn with_related_to(mut self, link_type: LinkType, target: IssueIdentifier) -> Self {
        self.related_to.push((link_type, target));
        self
    }

    /// Adds an incoming link from an existing issue.
    #[must_use]
    pub fn with_related_from(mut self, link_type: LinkType, source: IssueIdentifier) -> Self {
        self.related_from.push((link_type, source));
        self
    }

    fn staged_builder(&self) -> IssueBuilder {
        let mut builder = IssueBuilder::new()
            .with_title(self.title.clone())
            .with_description(self.description.clone());
        if let Some(priority) = self.priority {
            builder = builder.with_priority(priority);
        }
        if let Some(issue_type) = self.issue_type {
            builder = builder.with_type(issue_type);
        }
        if let Some(epic_id) = self.epic_id.clone() {
            builder = builder.with_epic(epic_id);
        }
        if let Some(reporter) = self.reporter.clone() {
            builder = builder.with_reporter(reporter);
        }
        if let Some(assignee) = self.assignee.clone() {
            builder = builder.with_assignee(assignee);
        }
        builder
    }

    fn links(&self) -> impl Iterator<Item = &(LinkType, IssueIdentifier)> {
        self.related_to.iter().chain(&self.related_from)
    }
}

/// Request payload for a lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeIssueStateRequest {
    id: IssueIdentifier,
    command: StateChangeCommand,
}

impl ChangeIssueStateRequest {
    /// Creates a state change request.
    #[must_use]
    pub const fn new(id: IssueIdentifier, command: StateChangeCommand) -> Self {
        Self { id, command }
    }
}

/// Request payload for commenting on an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    id: IssueIdentifier,
    author: TriageUser,
    content: String,
}

impl AddCommentRequest {
    /// Creates a comment request.
    #[must_use]
    pub fn new(id: IssueIdentifier, author: TriageUser, content: impl Into<String>) -> Self {
        Self {
            id,
            author,
            content: content.into(),
        }
    }
}

/// Request payload for linking two existing issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIssuesRequest {
    link_type: LinkType,
    left: IssueIdentifier,
    right: IssueIdentifier,
}

impl LinkIssuesRequest {
    /// Creates a request to link `left` to `right`.
    #[must_use]
    pub const fn new(link_type: LinkType, left: IssueIdentifier, right: IssueIdentifier) -> Self {
        Self {
            link_type,
            left,
            right,
        }
    }
}

/// Service-level errors for issue commands.
#[derive(Debug, Error)]
pub enum IssueServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),
    /// The issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(IssueIdentifier),
    /// The command is not legal in the issue's current state.
    #[error("cannot apply {command} to issue {id} in state {state}")]
    InvalidStateTransition {
        /// Issue the command targeted.
        id: IssueIdentifier,
        /// State the issue was in.
        state: IssueState,
        /// Rejected command.
        command: CommandKind,
    },
}

impl IssueServiceError {
    /// Returns whether this error is an optimistic-concurrency conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_conflict())
    }
}

/// Result type for issue command service operations.
pub type IssueServiceResult<T> = Result<T, IssueServiceError>;

/// Issue command orchestration service.
///
/// Each operation loads the aggregates it touches, applies one domain
/// operation, and saves them guarded by the tokens they were loaded with.
#[derive(Clone)]
pub struct IssueCommandService<R, C>
where
    R: IssueRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: IssueServiceConfig,
}

impl<R, C> IssueCommandService<R, C>
where
    R: IssueRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new issue command service with the default configuration.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            config: IssueServiceConfig::fail_fast(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: IssueServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> IssueServiceConfig {
        self.config
    }

    /// Creates and stores a new issue.
    ///
    /// The request is validated, and every linked issue must exist, before
    /// an issue number is reserved. The far end of each link is recorded on
    /// the linked issues. When saving a linked issue fails, the writes made
    /// so far are undone before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Domain`] when validation fails,
    /// [`IssueServiceError::NotFound`] when a linked issue does not exist, or
    /// [`IssueServiceError::Repository`] when persistence fails, including
    /// concurrency conflicts that outlast the configured retries.
    pub async fn create_issue(&self, request: CreateIssueRequest) -> IssueServiceResult<Issue> {
        let project = ProjectCode::new(request.project.as_str())?;
        let content = request.staged_builder();
        content.validate()?;
        self.load_counterparts(request.links()).await?;

        let number = match request.issue_number {
            Some(number) => IssueNumber::new(number)?,
            None => self.repository.next_issue_number(&project).await?,
        };
        let id = IssueIdentifier::new(project, number);
        let staged = content.with_id(id.clone());
        let (builder, links) = (&staged, &request);
        let issue = self
            .with_conflict_retries(&id, move || self.try_create_issue(builder, links))
            .await?;

        info!(issue_id = %issue.id(), issue_type = %issue.issue_type(), "Issue created");
        Ok(issue)
    }

    /// Retrieves an issue by identifier.
    ///
    /// Returns `Ok(None)` when the issue does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_issue(&self, id: &IssueIdentifier) -> IssueServiceResult<Option<Issue>> {
        Ok(self.repository.find_by_id(id, false).await?)
    }

    /// Applies a lifecycle command to an issue and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not exist,
    /// [`IssueServiceError::InvalidStateTransition`] when the command is not
    /// legal in the current state (nothing is persisted), or
    /// [`IssueServiceError::Repository`] when the save fails, including
    /// concurrency conflicts that outlast the configured retries.
    pub async fn change_state(
        &self,
        request: ChangeIssueStateRequest,
    ) -> IssueServiceResult<Issue> {
        let staged = &request;
        self.with_conflict_retries(&request.id, move || self.try_change_state(staged))
            .await
    }

    /// Appends a comment stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when the issue does not exist,
    /// [`IssueServiceError::Domain`] when the comment is invalid, or
    /// [`IssueServiceError::Repository`] when the save fails.
    pub async fn add_comment(&self, request: AddCommentRequest) -> IssueServiceResult<Issue> {
        let staged = &request;
        self.with_conflict_retries(&request.id, move || self.try_add_comment(staged))
            .await
    }

    /// Links two existing issues, recording the edge on both.
    ///
    /// Returns `Ok(false)` when the link already existed.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::NotFound`] when either issue does not
    /// exist or [`IssueServiceError::Repository`] when a save fails.
    pub async fn link_issues(&self, request: LinkIssuesRequest) -> IssueServiceResult<bool> {
        let staged = &request;
        self.with_conflict_retries(&request.left, move || self.try_link_issues(staged))
            .await
    }

    /// Deletes an issue, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`IssueServiceError::Repository`] when persistence fails.
    pub async fn delete_issue(&self, id: &IssueIdentifier) -> IssueServiceResult<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(issue_id = %id, "Issue deleted");
        }
        Ok(deleted)
    }

    async fn try_create_issue(
        &self,
        staged: &IssueBuilder,
        request: &CreateIssueRequest,
    ) -> IssueServiceResult<Issue> {
        let mut counterparts = self.load_counterparts(request.links()).await?;
        let mut builder = staged.clone();
        for (link_type, target_id) in &request.related_to {
            if let Some((target, _)) = counterparts.get(target_id) {
                builder = builder.with_related_to(*link_type, target);
            }
        }
        for (link_type, source_id) in &request.related_from {
            if let Some((source, _)) = counterparts.get(source_id) {
                builder = builder.with_related_from(*link_type, source);
            }
        }

        let originals: Vec<Issue> = counterparts
            .values()
            .map(|(counterpart, _)| counterpart.clone())
            .collect();
        let issue = {
            let mut linked: Vec<&mut Issue> = counterparts
                .values_mut()
                .map(|(counterpart, _)| counterpart)
                .collect();
            builder.build_linked(&mut linked)?
        };
        self.repository.store(&issue).await?;

        let mut written = Vec::new();
        for ((counterpart, expected), original) in counterparts.values().zip(&originals) {
            if counterpart.concurrency_token() == *expected {
                continue;
            }
            if let Err(err) = self.repository.save(counterpart, *expected).await {
                warn!(
                    issue_id = %issue.id(),
                    linked = %counterpart.id(),
                    error = %err,
                    "Undoing issue creation after failed save"
                );
                self.roll_back(&written).await;
                if let Err(delete_err) = self.repository.delete(issue.id()).await {
                    warn!(issue_id = %issue.id(), error = %delete_err, "Failed to remove issue");
                }
                return Err(err.into());
            }
            written.push((original, counterpart.concurrency_token()));
        }
        Ok(issue)
    }

    async fn try_change_state(
        &self,
        request: &ChangeIssueStateRequest,
    ) -> IssueServiceResult<Issue> {
        let mut issue = self.find_issue_for_update(&request.id).await?;
        let expected = issue.concurrency_token();
        let previous = issue.state();
        let command = request.command.kind();

        if !issue.execute(&request.command) {
            warn!(
                issue_id = %request.id,
                state = %previous,
                command = %command,
                "Rejected issue state change"
            );
            return Err(IssueServiceError::InvalidStateTransition {
                id: request.id.clone(),
                state: previous,
                command,
            });
        }

        self.repository.save(&issue, expected).await?;
        info!(
            issue_id = %request.id,
            from = %previous,
            to = %issue.state(),
            command = %command,
            "Issue state changed"
        );
        Ok(issue)
    }

    async fn try_add_comment(&self, request: &AddCommentRequest) -> IssueServiceResult<Issue> {
        let mut issue = self.find_issue_for_update(&request.id).await?;
        let expected = issue.concurrency_token();
        issue.add_comment(
            request.author.clone(),
            request.content.clone(),
            self.clock.utc(),
        )?;
        self.repository.save(&issue, expected).await?;
        debug!(issue_id = %request.id, comments = issue.comments().len(), "Comment added");
        Ok(issue)
    }

    async fn try_link_issues(&self, request: &LinkIssuesRequest) -> IssueServiceResult<bool> {
        let mut left = self.find_issue_for_update(&request.left).await?;
        let left_expected = left.concurrency_token();

        if request.left == request.right {
            let snapshot = left.clone();
            let outgoing = left.add_related_to(request.link_type, &snapshot);
            let incoming = left.add_related_from(request.link_type, &snapshot);
            if outgoing || incoming {
                self.repository.save(&left, left_expected).await?;
            }
            return Ok(outgoing || incoming);
        }

        let mut right = self.find_issue_for_update(&request.right).await?;
        let right_expected = right.concurrency_token();
        let left_original = left.clone();
        if !link_issues(request.link_type, &mut left, &mut right) {
            return Ok(false);
        }

        self.repository.save(&left, left_expected).await?;
        if let Err(err) = self.repository.save(&right, right_expected).await {
            warn!(
                left = %request.left,
                right = %request.right,
                error = %err,
                "Undoing issue link after failed save"
            );
            self.roll_back(&[(&left_original, left.concurrency_token())]).await;
            return Err(err.into());
        }
        info!(
            left = %request.left,
            right = %request.right,
            link_type = %request.link_type,
            "Issues linked"
        );
        Ok(true)
    }

    async fn find_issue_for_update(&self, id: &IssueIdentifier) -> IssueServiceResult<Issue> {
        self.repository
            .find_by_id(id, true)
            .await?
            .ok_or_else(|| IssueServiceError::NotFound(id.clone()))
    }

    /// Puts back the original of each issue this command saved, newest
    /// first. `written` pairs each original with the token the command's own
    /// save left behind.
    async fn roll_back(&self, written: &[(&Issue, ConcurrencyToken)]) {
        for (original, token) in written.iter().rev() {
            if let Err(err) = self.repository.save(original, *token).await {
                warn!(issue_id = %original.id(), error = %err, "Failed to roll back issue");
            }
        }
    }

    /// Loads each distinct linked issue along with the token it was read at.
    async fn load_counterparts<'a>(
        &self,
        links: impl Iterator<Item = &'a (LinkType, IssueIdentifier)>,
    ) -> IssueServiceResult<BTreeMap<IssueIdentifier, (Issue, ConcurrencyToken)>> {
        let mut counterparts = BTreeMap::new();
        for (_, id) in links {
            if counterparts.contains_key(id) {
                continue;
            }
            let issue = self.find_issue_for_update(id).await?;
            let token = issue.concurrency_token();
            counterparts.insert(id.clone(), (issue, token));
        }
        Ok(counterparts)
    }

    /// Runs `operation`, reloading and re-executing it after concurrency
    /// conflicts up to the configured limit.
    async fn with_conflict_retries<T, F, Fut>(
        &self,
        id: &IssueIdentifier,
        operation: F,
    ) -> IssueServiceResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = IssueServiceResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(err) if err.is_conflict() && attempt < self.config.max_conflict_retries => {
                    attempt += 1;
                    debug!(
                        issue_id = %id,
                        attempt,
                        error = %err,
                        "Retrying issue command after concurrency conflict"
                    );
                }
                result => return result,
            }
        }
    }
}
