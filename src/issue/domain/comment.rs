//! Comments attached to an issue.

use super::{IssueDomainError, TriageUser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Immutable comment recorded against an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    author: TriageUser,
    content: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a validated comment.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyComment`] when the content is blank or
    /// [`IssueDomainError::CommentTooLong`] when it exceeds
    /// [`MAX_COMMENT_LENGTH`] characters.
    pub fn new(
        author: TriageUser,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, IssueDomainError> {
        let raw = content.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(IssueDomainError::EmptyComment);
        }
        let length = normalized.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(IssueDomainError::CommentTooLong {
                max: MAX_COMMENT_LENGTH,
                length,
            });
        }

        Ok(Self {
            author,
            content: normalized.to_owned(),
            created_at,
        })
    }

    /// Returns the comment author.
    #[must_use]
    pub const fn author(&self) -> &TriageUser {
        &self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the comment was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
