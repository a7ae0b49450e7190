//! Repository port for issue persistence with optimistic concurrency.

use crate::issue::domain::{ConcurrencyToken, Issue, IssueIdentifier, IssueNumber, ProjectCode};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue persistence contract.
///
/// Writes to an existing issue are fenced by its concurrency token: an
/// implementation must refuse to overwrite an issue that another writer has
/// changed since it was read.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when an issue with the
    /// same identifier already exists.
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Persists changes to an existing issue.
    ///
    /// `expected` is the concurrency token the issue carried when it was
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NotFound`] when the issue does not
    /// exist or [`IssueRepositoryError::Conflict`] when the stored token no
    /// longer matches `expected`.
    async fn save(&self, issue: &Issue, expected: ConcurrencyToken) -> IssueRepositoryResult<()>;

    /// Finds an issue by identifier.
    ///
    /// `for_update` signals that the caller intends to save the issue;
    /// implementations backed by a database may take a row lock. Returns
    /// `None` when the issue does not exist.
    async fn find_by_id(
        &self,
        id: &IssueIdentifier,
        for_update: bool,
    ) -> IssueRepositoryResult<Option<Issue>>;

    /// Deletes an issue, returning whether it existed.
    async fn delete(&self, id: &IssueIdentifier) -> IssueRepositoryResult<bool>;

    /// Reserves the next issue number for `project`.
    ///
    /// Numbers are never handed out twice, even after deletion.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::NumbersExhausted`] when the project
    /// has used every representable number.
    async fn next_issue_number(&self, project: &ProjectCode) -> IssueRepositoryResult<IssueNumber>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueIdentifier),

    /// The issue was not found.
    #[error("issue not found: {0}")]
    NotFound(IssueIdentifier),

    /// The issue was changed by another writer since it was loaded.
    #[error("concurrency conflict on {id}: expected token {expected}, found {actual}")]
    Conflict {
        /// Issue being saved.
        id: IssueIdentifier,
        /// Token the caller loaded.
        expected: ConcurrencyToken,
        /// Token currently stored.
        actual: ConcurrencyToken,
    },

    /// No further issue numbers can be assigned in the project.
    #[error("issue numbers exhausted for project {0}")]
    NumbersExhausted(ProjectCode),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether this error is an optimistic-concurrency conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
