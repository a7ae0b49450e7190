//! Issue lifecycle states and the transition table.

use super::{IssueDomainError, ParseIssueStateError, StateChangeCommand};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issue lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// Issue has been recorded but not scheduled.
    #[default]
    Backlog,
    /// Issue is scheduled for work.
    ToDo,
    /// Issue is being worked.
    InProgress,
    /// Work is awaiting review.
    InReview,
    /// Work is awaiting test.
    InTesting,
    /// Work has been completed.
    Complete,
    /// Issue was triaged as not worth doing.
    WontDo,
    /// Issue was triaged as not a defect.
    NotADefect,
    /// Issue was triaged as not reproducible.
    CannotReproduce,
    /// Closed after being resolved.
    ClosedAsResolved,
    /// Closed and deferred to a later date.
    ClosedAsDeferred,
    /// Closed as will not be done.
    ClosedAsWontDo,
    /// Closed as not a defect.
    ClosedAsNotADefect,
    /// Closed as not reproducible.
    ClosedAsCannotReproduce,
}

impl IssueState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Backlog,
        Self::ToDo,
        Self::InProgress,
        Self::InReview,
        Self::InTesting,
        Self::Complete,
        Self::WontDo,
        Self::NotADefect,
        Self::CannotReproduce,
        Self::ClosedAsResolved,
        Self::ClosedAsDeferred,
        Self::ClosedAsWontDo,
        Self::ClosedAsNotADefect,
        Self::ClosedAsCannotReproduce,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::ToDo => "to_do",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::InTesting => "in_testing",
            Self::Complete => "complete",
            Self::WontDo => "wont_do",
            Self::NotADefect => "not_a_defect",
            Self::CannotReproduce => "cannot_reproduce",
            Self::ClosedAsResolved => "closed_as_resolved",
            Self::ClosedAsDeferred => "closed_as_deferred",
            Self::ClosedAsWontDo => "closed_as_wont_do",
            Self::ClosedAsNotADefect => "closed_as_not_a_defect",
            Self::ClosedAsCannotReproduce => "closed_as_cannot_reproduce",
        }
    }

    /// Returns whether this is one of the `ClosedAs*` states.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(
            self,
            Self::ClosedAsResolved
                | Self::ClosedAsDeferred
                | Self::ClosedAsWontDo
                | Self::ClosedAsNotADefect
                | Self::ClosedAsCannotReproduce
        )
    }

    /// Returns the state that `command` leads to, or `None` when the
    /// command is not accepted in this state.
    ///
    /// This is the single transition table; [`Self::can_execute`] and the
    /// aggregate's `execute` are both derived from it.
    #[must_use]
    pub const fn transition(self, command: &StateChangeCommand) -> Option<Self> {
        use StateChangeCommand as C;

        let next = match (self, command) {
            (Self::Backlog, C::ToDo) => Self::ToDo,
            (
                Self::Backlog
                | Self::ToDo
                | Self::CannotReproduce
                | Self::Complete
                | Self::ClosedAsNotADefect
                | Self::ClosedAsCannotReproduce
                | Self::ClosedAsResolved
                | Self::ClosedAsDeferred,
                C::Open { .. },
            )
            | (Self::InReview, C::ReviewFailed)
            | (Self::InTesting, C::TestFailed) => Self::InProgress,
            (Self::Backlog | Self::ToDo, C::WontDo { .. }) => Self::WontDo,
            (Self::Backlog | Self::ToDo, C::CannotReproduce { .. }) => Self::CannotReproduce,
            (Self::Backlog | Self::ToDo, C::NotADefect { .. }) => Self::NotADefect,
            (
                Self::ToDo
                | Self::WontDo
                | Self::NotADefect
                | Self::ClosedAsWontDo
                | Self::ClosedAsDeferred,
                C::MoveToBacklog,
            ) => Self::Backlog,
            (Self::InProgress, C::ReadyForReview) => Self::InReview,
            (Self::InReview, C::ReadyForTest) => Self::InTesting,
            (Self::InTesting, C::Complete { .. }) => Self::Complete,
            (Self::WontDo, C::Close { .. }) => Self::ClosedAsWontDo,
            (Self::NotADefect, C::Close { .. }) => Self::ClosedAsNotADefect,
            (Self::CannotReproduce, C::Close { reason }) => reason.closed_state(),
            _ => return None,
        };
        Some(next)
    }

    /// Returns whether `command` is accepted in this state.
    #[must_use]
    pub const fn can_execute(self, command: &StateChangeCommand) -> bool {
        self.transition(command).is_some()
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IssueState {
    type Error = ParseIssueStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseIssueStateError(value.to_owned()))
    }
}

/// Why an issue was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    /// The work was done.
    Resolved,
    /// The work was postponed.
    Deferred,
    /// The work will not be done.
    WontDo,
    /// The report was not a defect.
    NotADefect,
    /// The report could not be reproduced.
    CannotReproduce,
}

impl ClosureReason {
    /// Every closure reason, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Resolved,
        Self::Deferred,
        Self::WontDo,
        Self::NotADefect,
        Self::CannotReproduce,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Deferred => "deferred",
            Self::WontDo => "wont_do",
            Self::NotADefect => "not_a_defect",
            Self::CannotReproduce => "cannot_reproduce",
        }
    }

    /// Returns the terminal state this reason closes an issue into.
    #[must_use]
    pub const fn closed_state(self) -> IssueState {
        match self {
            Self::Resolved => IssueState::ClosedAsResolved,
            Self::Deferred => IssueState::ClosedAsDeferred,
            Self::WontDo => IssueState::ClosedAsWontDo,
            Self::NotADefect => IssueState::ClosedAsNotADefect,
            Self::CannotReproduce => IssueState::ClosedAsCannotReproduce,
        }
    }
}

impl fmt::Display for ClosureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ClosureReason {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str() == normalized)
            .ok_or_else(|| IssueDomainError::InvalidClosureReason(value.to_owned()))
    }
}
