//! Error types for issue domain validation and parsing.

use super::IssueIdentifier;
use thiserror::Error;

/// Errors returned while constructing or mutating issue domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueDomainError {
    /// The project code is not 1-3 ASCII letters.
    #[error("invalid project code '{0}', expected 1-3 letters")]
    InvalidProjectCode(String),

    /// The issue number is not a positive integer.
    #[error("invalid issue number {0}, expected a positive integer")]
    InvalidIssueNumber(i64),

    /// The issue title is empty.
    #[error("issue title must not be empty")]
    EmptyTitle,

    /// The issue title exceeds the 200-character limit.
    #[error("issue title exceeds {max} characters (got {length})")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Rejected length.
        length: usize,
    },

    /// The issue description exceeds the 500-character limit.
    #[error("issue description exceeds {max} characters (got {length})")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Rejected length.
        length: usize,
    },

    /// An epic cannot itself belong to an epic.
    #[error("an epic cannot belong to epic {0}")]
    EpicOnEpic(IssueIdentifier),

    /// A staged link names an issue that was not supplied to the builder.
    #[error("linked issue {0} was not supplied")]
    MissingLinkedIssue(IssueIdentifier),

    /// A user full name is empty after trimming.
    #[error("user full name must not be empty")]
    EmptyUserName,

    /// A comment has no content after trimming.
    #[error("comment content must not be empty")]
    EmptyComment,

    /// A comment exceeds the 500-character limit.
    #[error("comment content exceeds {max} characters (got {length})")]
    CommentTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Rejected length.
        length: usize,
    },

    /// The builder has no description staged.
    #[error("issue description must not be empty")]
    MissingDescription,

    /// The builder has neither an identifier nor a project and issue number.
    #[error("either an issue identifier or a project and issue number must be set")]
    MissingIdentity,

    /// The builder has both an identifier and a project or issue number.
    #[error("an issue identifier cannot be combined with a project or issue number")]
    ConflictingIdentity,

    /// The priority value is unsupported.
    #[error("unknown priority: {0}")]
    InvalidPriority(String),

    /// The issue type value is unsupported.
    #[error("unknown issue type: {0}")]
    InvalidIssueType(String),

    /// The link type value is unsupported.
    #[error("unknown link type: {0}")]
    InvalidLinkType(String),

    /// The closure reason value is unsupported.
    #[error("unknown closure reason: {0}")]
    InvalidClosureReason(String),
}

/// Error returned while parsing the canonical `PROJECT-NUMBER` form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseIssueIdentifierError {
    /// The value contains no `-` separator.
    #[error("malformed issue identifier '{0}', expected PROJECT-NUMBER")]
    MissingSeparator(String),

    /// The project segment is not 1-3 letters.
    #[error("malformed issue identifier '{0}', invalid project segment")]
    InvalidProject(String),

    /// The number segment is not a positive integer.
    #[error("malformed issue identifier '{0}', invalid number segment")]
    InvalidNumber(String),
}

/// Error returned while parsing issue states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown issue state: {0}")]
pub struct ParseIssueStateError(pub String);
