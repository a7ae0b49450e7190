//! In-memory repository for issue triage tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::issue::{
    domain::{ConcurrencyToken, Issue, IssueIdentifier, IssueNumber, ProjectCode},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};

/// Thread-safe in-memory issue repository.
///
/// Saves are token-guarded under a single write lock, so concurrent writers
/// observe the same conflict semantics as a database-backed adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    state: Arc<RwLock<InMemoryIssueState>>,
}

#[derive(Debug, Default)]
struct InMemoryIssueState {
    issues: HashMap<IssueIdentifier, Issue>,
    last_issued: HashMap<ProjectCode, IssueNumber>,
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored issues.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> IssueRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.issues.len())
    }

    /// Returns whether the repository holds no issues.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> IssueRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn lock_error(err: &impl fmt::Display) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Raises the high-water mark for the issue's project to its number.
fn record_issued(state: &mut InMemoryIssueState, id: &IssueIdentifier) {
    let entry = state
        .last_issued
        .entry(id.project().clone())
        .or_insert_with(|| id.number());
    if id.number() > *entry {
        *entry = id.number();
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn store(&self, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.issues.contains_key(issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id().clone()));
        }

        record_issued(&mut state, issue.id());
        state.issues.insert(issue.id().clone(), issue.clone());
        Ok(())
    }

    async fn save(&self, issue: &Issue, expected: ConcurrencyToken) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let stored = state
            .issues
            .get_mut(issue.id())
            .ok_or_else(|| IssueRepositoryError::NotFound(issue.id().clone()))?;

        let actual = stored.concurrency_token();
        if actual != expected {
            return Err(IssueRepositoryError::Conflict {
                id: issue.id().clone(),
                expected,
                actual,
            });
        }

        *stored = issue.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &IssueIdentifier,
        _for_update: bool,
    ) -> IssueRepositoryResult<Option<Issue>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.issues.get(id).cloned())
    }

    async fn delete(&self, id: &IssueIdentifier) -> IssueRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        Ok(state.issues.remove(id).is_some())
    }

    async fn next_issue_number(&self, project: &ProjectCode) -> IssueRepositoryResult<IssueNumber> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let next = state
            .last_issued
            .get(project)
            .map_or(Some(IssueNumber::FIRST), |last| last.next())
            .ok_or_else(|| IssueRepositoryError::NumbersExhausted(project.clone()))?;
        state.last_issued.insert(project.clone(), next);
        Ok(next)
    }
}
