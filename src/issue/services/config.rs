//! Configuration for the issue command service.

/// Tunables for [`IssueCommandService`](super::IssueCommandService).
///
/// # Examples
///
/// ```
/// use triage::issue::services::IssueServiceConfig;
///
/// let config = IssueServiceConfig::default();
/// assert_eq!(config.max_conflict_retries, 0);
///
/// let retrying = IssueServiceConfig::retrying();
/// assert!(retrying.max_conflict_retries > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IssueServiceConfig {
    /// How many times a command is reloaded and re-executed after an
    /// optimistic-concurrency conflict before the conflict is returned.
    pub max_conflict_retries: u32,
}

impl IssueServiceConfig {
    /// Creates a configuration that surfaces every conflict to the caller.
    #[must_use]
    pub const fn fail_fast() -> Self {
        Self {
            max_conflict_retries: 0,
        }
    }

    /// Creates a configuration that retries conflicting commands a few
    /// times.
    ///
    /// Useful when several writers routinely touch the same issues.
    #[must_use]
    pub const fn retrying() -> Self {
        Self {
            max_conflict_retries: 3,
        }
    }

    /// Overrides the conflict retry limit.
    #[must_use]
    pub const fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }
}
