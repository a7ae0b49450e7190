//! Identifier and validated scalar types for the issue domain.

use super::{IssueDomainError, ParseIssueIdentifierError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of letters in a project code.
const MAX_PROJECT_CODE_LENGTH: usize = 3;

/// Validated project code: one to three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectCode(String);

impl ProjectCode {
    /// Creates a validated project code.
    ///
    /// The input is trimmed and upper-cased before validation, so `app` and
    /// ` APP ` both yield `APP`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidProjectCode`] when the value is
    /// empty, longer than three characters or contains anything other than
    /// ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, IssueDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        let is_valid = !normalized.is_empty()
            && normalized.len() <= MAX_PROJECT_CODE_LENGTH
            && normalized.chars().all(|c| c.is_ascii_alphabetic());

        if !is_valid {
            return Err(IssueDomainError::InvalidProjectCode(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the project code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectCode {
    type Error = IssueDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProjectCode> for String {
    fn from(value: ProjectCode) -> Self {
        value.0
    }
}

impl AsRef<str> for ProjectCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Positive, per-project sequential issue number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(u32);

impl IssueNumber {
    /// The first number assigned within a project.
    pub const FIRST: Self = Self(1);

    /// Creates a validated issue number.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::InvalidIssueNumber`] when the value is zero,
    /// negative or exceeds `u32::MAX`.
    pub fn new(value: i64) -> Result<Self, IssueDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|number| *number > 0)
            .map(Self)
            .ok_or(IssueDomainError::InvalidIssueNumber(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the number following this one, if representable.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an issue by project code and sequential number.
///
/// The canonical text form is `PROJECT-NUMBER`, for example `APP-12`.
/// Ordering is by project, then number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueIdentifier {
    project: ProjectCode,
    number: IssueNumber,
}

impl IssueIdentifier {
    /// Creates an identifier from validated components.
    #[must_use]
    pub const fn new(project: ProjectCode, number: IssueNumber) -> Self {
        Self { project, number }
    }

    /// Creates an identifier from raw values.
    ///
    /// The project code is normalized as by [`ProjectCode::new`].
    ///
    /// # Errors
    ///
    /// Returns an [`IssueDomainError`] when either component is invalid.
    pub fn from_parts(project: &str, number: i64) -> Result<Self, IssueDomainError> {
        Ok(Self::new(ProjectCode::new(project)?, IssueNumber::new(number)?))
    }

    /// Parses the canonical `PROJECT-NUMBER` form.
    ///
    /// The value is split on its last `-`. The project segment is accepted
    /// in any case and stored upper-cased, so `app-7` parses as `APP-7`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIssueIdentifierError`] when the separator is missing,
    /// the project segment is not 1-3 letters or the number segment is not a
    /// positive decimal integer.
    pub fn parse(value: &str) -> Result<Self, ParseIssueIdentifierError> {
        let (project, number) = value
            .rsplit_once('-')
            .ok_or_else(|| ParseIssueIdentifierError::MissingSeparator(value.to_owned()))?;

        let project_code = ProjectCode::new(project)
            .map_err(|_| ParseIssueIdentifierError::InvalidProject(value.to_owned()))?;

        let invalid_number = || ParseIssueIdentifierError::InvalidNumber(value.to_owned());
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid_number());
        }
        let issue_number = number
            .parse::<i64>()
            .ok()
            .and_then(|raw| IssueNumber::new(raw).ok())
            .ok_or_else(invalid_number)?;

        Ok(Self::new(project_code, issue_number))
    }

    /// Returns the project code.
    #[must_use]
    pub const fn project(&self) -> &ProjectCode {
        &self.project
    }

    /// Returns the issue number.
    #[must_use]
    pub const fn number(&self) -> IssueNumber {
        self.number
    }
}

impl FromStr for IssueIdentifier {
    type Err = ParseIssueIdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for IssueIdentifier {
    type Error = ParseIssueIdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IssueIdentifier> for String {
    fn from(value: IssueIdentifier) -> Self {
        value.to_string()
    }
}

impl fmt::Display for IssueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.number)
    }
}

/// Opaque optimistic-concurrency token.
///
/// A fresh token is generated on every successful aggregate mutation.
/// Repositories compare tokens to detect lost updates; the aggregate never
/// interprets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcurrencyToken(Uuid);

impl ConcurrencyToken {
    /// Creates a new random token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a token from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ConcurrencyToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConcurrencyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
