//! Shared world state for issue lifecycle BDD scenarios.

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::fixture;
use triage::issue::{
    adapters::memory::InMemoryIssueRepository,
    domain::{Issue, StateChangeCommand},
    services::{IssueCommandService, IssueServiceError},
};

/// Service type used by the BDD world.
pub type TestIssueService = IssueCommandService<InMemoryIssueRepository, DefaultClock>;

/// Scenario world for issue lifecycle behaviour tests.
pub struct IssueTransitionWorld {
    pub service: TestIssueService,
    pub current_issue: Option<Issue>,
    pub last_command_result: Option<Result<Issue, IssueServiceError>>,
}

impl IssueTransitionWorld {
    /// Creates a world with an empty repository.
    #[must_use]
    pub fn new() -> Self {
        let service = IssueCommandService::new(
            Arc::new(InMemoryIssueRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            current_issue: None,
            last_command_result: None,
        }
    }

    /// Returns the issue the scenario is acting on.
    ///
    /// # Errors
    ///
    /// Returns an error when no issue has been created yet.
    pub fn issue(&self) -> Result<&Issue, eyre::Report> {
        self.current_issue
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current issue in scenario world"))
    }
}

impl Default for IssueTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IssueTransitionWorld {
    IssueTransitionWorld::default()
}

/// Maps a command name used in feature files to a command stamped now.
///
/// # Errors
///
/// Returns an error for names that do not denote a payload-free or
/// timestamped command.
pub fn command_named(name: &str) -> Result<StateChangeCommand, eyre::Report> {
    let now = Utc::now();
    let command = match name {
        "open" => StateChangeCommand::Open { started_at: now },
        "to_do" => StateChangeCommand::ToDo,
        "move_to_backlog" => StateChangeCommand::MoveToBacklog,
        "ready_for_review" => StateChangeCommand::ReadyForReview,
        "review_failed" => StateChangeCommand::ReviewFailed,
        "ready_for_test" => StateChangeCommand::ReadyForTest,
        "test_failed" => StateChangeCommand::TestFailed,
        "complete" => StateChangeCommand::Complete { stopped_at: now },
        "wont_do" => StateChangeCommand::WontDo { stopped_at: now },
        "not_a_defect" => StateChangeCommand::NotADefect { stopped_at: now },
        "cannot_reproduce" => StateChangeCommand::CannotReproduce { stopped_at: now },
        other => return Err(eyre::eyre!("unknown command in scenario: {other}")),
    };
    Ok(command)
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
