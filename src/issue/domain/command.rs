//! Lifecycle commands accepted by the issue state machine.

use super::ClosureReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request to move an issue through its lifecycle.
///
/// Commands carry only the data their transition needs. Timestamps are
/// supplied by the caller; the aggregate never reads a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StateChangeCommand {
    /// Start (or restart) work on the issue.
    Open {
        /// When work started.
        started_at: DateTime<Utc>,
    },
    /// Close the issue for the given reason.
    Close {
        /// Why the issue is closed.
        reason: ClosureReason,
    },
    /// Return the issue to the backlog.
    MoveToBacklog,
    /// Hand implemented work over for review.
    ReadyForReview,
    /// Send reviewed work back for rework.
    ReviewFailed,
    /// Hand reviewed work over for testing.
    ReadyForTest,
    /// Send tested work back for rework.
    TestFailed,
    /// Mark tested work as complete.
    Complete {
        /// When work stopped.
        stopped_at: DateTime<Utc>,
    },
    /// Decide the issue will not be done.
    WontDo {
        /// When work stopped.
        stopped_at: DateTime<Utc>,
    },
    /// Decide the reported defect is not a defect.
    NotADefect {
        /// When work stopped.
        stopped_at: DateTime<Utc>,
    },
    /// Decide the reported defect cannot be reproduced.
    CannotReproduce {
        /// When work stopped.
        stopped_at: DateTime<Utc>,
    },
    /// Schedule the issue for work.
    ToDo,
}

impl StateChangeCommand {
    /// Shorthand for [`StateChangeCommand::Close`].
    #[must_use]
    pub const fn close(reason: ClosureReason) -> Self {
        Self::Close { reason }
    }

    /// Returns the data-free discriminant of this command.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Open { .. } => CommandKind::Open,
            Self::Close { .. } => CommandKind::Close,
            Self::MoveToBacklog => CommandKind::MoveToBacklog,
            Self::ReadyForReview => CommandKind::ReadyForReview,
            Self::ReviewFailed => CommandKind::ReviewFailed,
            Self::ReadyForTest => CommandKind::ReadyForTest,
            Self::TestFailed => CommandKind::TestFailed,
            Self::Complete { .. } => CommandKind::Complete,
            Self::WontDo { .. } => CommandKind::WontDo,
            Self::NotADefect { .. } => CommandKind::NotADefect,
            Self::CannotReproduce { .. } => CommandKind::CannotReproduce,
            Self::ToDo => CommandKind::ToDo,
        }
    }

    /// Returns the stop time carried by terminal-bound commands.
    #[must_use]
    pub const fn stopped_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Complete { stopped_at }
            | Self::WontDo { stopped_at }
            | Self::NotADefect { stopped_at }
            | Self::CannotReproduce { stopped_at } => Some(*stopped_at),
            Self::Open { .. }
            | Self::Close { .. }
            | Self::MoveToBacklog
            | Self::ReadyForReview
            | Self::ReviewFailed
            | Self::ReadyForTest
            | Self::TestFailed
            | Self::ToDo => None,
        }
    }
}

/// Kind of a [`StateChangeCommand`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// See [`StateChangeCommand::Open`].
    Open,
    /// See [`StateChangeCommand::Close`].
    Close,
    /// See [`StateChangeCommand::MoveToBacklog`].
    MoveToBacklog,
    /// See [`StateChangeCommand::ReadyForReview`].
    ReadyForReview,
    /// See [`StateChangeCommand::ReviewFailed`].
    ReviewFailed,
    /// See [`StateChangeCommand::ReadyForTest`].
    ReadyForTest,
    /// See [`StateChangeCommand::TestFailed`].
    TestFailed,
    /// See [`StateChangeCommand::Complete`].
    Complete,
    /// See [`StateChangeCommand::WontDo`].
    WontDo,
    /// See [`StateChangeCommand::NotADefect`].
    NotADefect,
    /// See [`StateChangeCommand::CannotReproduce`].
    CannotReproduce,
    /// See [`StateChangeCommand::ToDo`].
    ToDo,
}

impl CommandKind {
    /// Returns the canonical name of the command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::MoveToBacklog => "move_to_backlog",
            Self::ReadyForReview => "ready_for_review",
            Self::ReviewFailed => "review_failed",
            Self::ReadyForTest => "ready_for_test",
            Self::TestFailed => "test_failed",
            Self::Complete => "complete",
            Self::WontDo => "wont_do",
            Self::NotADefect => "not_a_defect",
            Self::CannotReproduce => "cannot_reproduce",
            Self::ToDo => "to_do",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
