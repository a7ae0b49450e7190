//! Directed, typed relationships between issues.

use super::{IssueDomainError, IssueIdentifier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic relation carried by an [`IssueLink`].
///
/// Links are directed; the reading depends on which end you stand on
/// (`Blocking` reads as "blocks" from the left and "blocked by" from the
/// right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Loosely related work.
    Related,
    /// Duplicates, or is duplicated by.
    Duplicate,
    /// Blocks, or is blocked by.
    Blocking,
    /// Clones, or is cloned from.
    Clone,
}

impl LinkType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Duplicate => "duplicate",
            Self::Blocking => "blocking",
            Self::Clone => "clone",
        }
    }
}

impl TryFrom<&str> for LinkType {
    type Error = IssueDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "related" => Ok(Self::Related),
            "duplicate" => Ok(Self::Duplicate),
            "blocking" => Ok(Self::Blocking),
            "clone" => Ok(Self::Clone),
            _ => Err(IssueDomainError::InvalidLinkType(value.to_owned())),
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed edge from `left` to `right`.
///
/// Equality is by value, so the same type and endpoints form one link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueLink {
    link_type: LinkType,
    left: IssueIdentifier,
    right: IssueIdentifier,
}

impl IssueLink {
    /// Creates a link from `left` to `right`.
    #[must_use]
    pub const fn new(link_type: LinkType, left: IssueIdentifier, right: IssueIdentifier) -> Self {
        Self {
            link_type,
            left,
            right,
        }
    }

    /// Returns the link type.
    #[must_use]
    pub const fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Returns the source end of the link.
    #[must_use]
    pub const fn left(&self) -> &IssueIdentifier {
        &self.left
    }

    /// Returns the target end of the link.
    #[must_use]
    pub const fn right(&self) -> &IssueIdentifier {
        &self.right
    }
}

impl fmt::Display for IssueLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.left, self.link_type, self.right)
    }
}
