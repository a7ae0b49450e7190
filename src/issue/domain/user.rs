//! Reporter and assignee identity value objects.

use super::IssueDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Display name used by the unassigned sentinel.
const UNASSIGNED_NAME: &str = "Unassigned";

fn validated_name(full_name: impl Into<String>) -> Result<String, IssueDomainError> {
    let raw = full_name.into();
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(IssueDomainError::EmptyUserName);
    }
    Ok(normalized.to_owned())
}

/// User who reported or triaged an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriageUser {
    id: Uuid,
    full_name: String,
}

impl TriageUser {
    /// Creates a triage user.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyUserName`] if the name is empty after
    /// trimming.
    pub fn new(id: Uuid, full_name: impl Into<String>) -> Result<Self, IssueDomainError> {
        Ok(Self {
            id,
            full_name: validated_name(full_name)?,
        })
    }

    /// Returns the sentinel used when no reporter is known.
    #[must_use]
    pub fn unassigned() -> Self {
        Self {
            id: Uuid::nil(),
            full_name: UNASSIGNED_NAME.to_owned(),
        }
    }

    /// Returns whether this is the unassigned sentinel.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.id.is_nil()
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the user's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl Default for TriageUser {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl fmt::Display for TriageUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Maintainer responsible for working an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Maintainer {
    id: Uuid,
    full_name: String,
}

impl Maintainer {
    /// Creates a maintainer.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyUserName`] if the name is empty after
    /// trimming.
    pub fn new(id: Uuid, full_name: impl Into<String>) -> Result<Self, IssueDomainError> {
        Ok(Self {
            id,
            full_name: validated_name(full_name)?,
        })
    }

    /// Returns the sentinel used when nobody is assigned.
    #[must_use]
    pub fn unassigned() -> Self {
        Self {
            id: Uuid::nil(),
            full_name: UNASSIGNED_NAME.to_owned(),
        }
    }

    /// Returns whether this is the unassigned sentinel.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.id.is_nil()
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the maintainer's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl Default for Maintainer {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl fmt::Display for Maintainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
