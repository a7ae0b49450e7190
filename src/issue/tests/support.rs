//! Shared fixtures for issue unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::issue::domain::{
    ClosureReason, ConcurrencyToken, Issue, IssueIdentifier, IssueState, IssueType, Maintainer,
    PersistedIssueData, Priority, StateChangeCommand, TriageUser,
};

/// Returns a fixed instant on 1 May 2024 at the given hour.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Parses an identifier that the test knows to be valid.
pub fn id(value: &str) -> IssueIdentifier {
    IssueIdentifier::parse(value).expect("valid issue identifier")
}

/// Rehydrates `APP-1` in the given state.
pub fn issue_in_state(state: IssueState) -> Issue {
    Issue::from_persisted(PersistedIssueData {
        id: id("APP-1"),
        title: "Add login".to_owned(),
        description: "Users need to sign in".to_owned(),
        priority: Priority::Medium,
        issue_type: IssueType::Story,
        epic_id: None,
        reporter: TriageUser::unassigned(),
        assignee: Maintainer::unassigned(),
        state,
        start_time: None,
        stop_time: None,
        related_to: Vec::new(),
        related_from: Vec::new(),
        comments: Vec::new(),
        concurrency_token: ConcurrencyToken::new(),
    })
}

/// One instance of every command, with `Close` expanded over every reason.
pub fn every_command() -> Vec<StateChangeCommand> {
    let mut commands = vec![
        StateChangeCommand::Open { started_at: at(9) },
        StateChangeCommand::MoveToBacklog,
        StateChangeCommand::ReadyForReview,
        StateChangeCommand::ReviewFailed,
        StateChangeCommand::ReadyForTest,
        StateChangeCommand::TestFailed,
        StateChangeCommand::Complete { stopped_at: at(17) },
        StateChangeCommand::WontDo { stopped_at: at(17) },
        StateChangeCommand::NotADefect { stopped_at: at(17) },
        StateChangeCommand::CannotReproduce { stopped_at: at(17) },
        StateChangeCommand::ToDo,
    ];
    commands.extend(ClosureReason::ALL.into_iter().map(StateChangeCommand::close));
    commands
}
