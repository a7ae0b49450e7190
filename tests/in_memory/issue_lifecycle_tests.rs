//! In-memory integration tests for issue command dispatch.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use triage::issue::{
    adapters::memory::InMemoryIssueRepository,
    domain::{ClosureReason, Issue, IssueState, IssueType, LinkType, StateChangeCommand},
    services::{
        ChangeIssueStateRequest, CreateIssueRequest, IssueCommandService, IssueServiceError,
        LinkIssuesRequest,
    },
};

type TestService = IssueCommandService<InMemoryIssueRepository, DefaultClock>;

#[fixture]
fn service() -> TestService {
    IssueCommandService::new(
        Arc::new(InMemoryIssueRepository::new()),
        Arc::new(DefaultClock),
    )
}

async fn apply(
    service: &TestService,
    issue: &Issue,
    command: StateChangeCommand,
) -> Result<Issue, IssueServiceError> {
    service
        .change_state(ChangeIssueStateRequest::new(issue.id().clone(), command))
        .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_walks_happy_path_to_complete(service: TestService) -> Result<(), eyre::Report> {
    let started = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid start time"))?;
    let stopped = Utc
        .with_ymd_and_hms(2024, 5, 3, 17, 30, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid stop time"))?;
    let mut issue = service
        .create_issue(
            CreateIssueRequest::new("APP", "Add login", "Users need to sign in")
                .with_type(IssueType::Story),
        )
        .await?;

    for command in [
        StateChangeCommand::ToDo,
        StateChangeCommand::Open {
            started_at: started,
        },
        StateChangeCommand::ReadyForReview,
        StateChangeCommand::ReadyForTest,
        StateChangeCommand::Complete {
            stopped_at: stopped,
        },
    ] {
        issue = apply(&service, &issue, command).await?;
    }

    let stored = service
        .find_issue(issue.id())
        .await?
        .ok_or_else(|| eyre::eyre!("issue missing after lifecycle"))?;
    eyre::ensure!(stored.state() == IssueState::Complete);
    eyre::ensure!(stored.start_time() == Some(started));
    eyre::ensure!(stored.stop_time() == Some(stopped));

    let view = serde_json::to_value(stored.view())?;
    eyre::ensure!(view["state"] == "complete");
    eyre::ensure!(view["type"] == "story");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn triaged_defect_can_be_closed_and_reopened(
    service: TestService,
) -> Result<(), eyre::Report> {
    let mut issue = service
        .create_issue(CreateIssueRequest::new("MOB", "Crash on launch", "Android 14"))
        .await?;

    issue = apply(
        &service,
        &issue,
        StateChangeCommand::CannotReproduce {
            stopped_at: Utc::now(),
        },
    )
    .await?;
    issue = apply(
        &service,
        &issue,
        StateChangeCommand::close(ClosureReason::CannotReproduce),
    )
    .await?;
    eyre::ensure!(issue.state() == IssueState::ClosedAsCannotReproduce);

    issue = apply(
        &service,
        &issue,
        StateChangeCommand::Open {
            started_at: Utc::now(),
        },
    )
    .await?;
    eyre::ensure!(issue.state() == IssueState::InProgress);
    eyre::ensure!(issue.stop_time().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_commands_are_reported_per_state(
    service: TestService,
) -> Result<(), eyre::Report> {
    let issue = service
        .create_issue(CreateIssueRequest::new("APP", "Add login", "Sign in"))
        .await?;

    for command in [
        StateChangeCommand::ReadyForReview,
        StateChangeCommand::close(ClosureReason::Resolved),
        StateChangeCommand::TestFailed,
    ] {
        let result = apply(&service, &issue, command).await;
        let Err(IssueServiceError::InvalidStateTransition {
            state,
            command: kind,
            ..
        }) = result
        else {
            return Err(eyre::eyre!("expected rejection, got {result:?}"));
        };
        eyre::ensure!(state == IssueState::Backlog);
        eyre::ensure!(kind == command.kind());
    }

    let stored = service
        .find_issue(issue.id())
        .await?
        .ok_or_else(|| eyre::eyre!("issue missing"))?;
    eyre::ensure!(stored == issue, "rejections must not persist anything");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn linked_issues_survive_state_changes(service: TestService) -> Result<(), eyre::Report> {
    let epic = service
        .create_issue(
            CreateIssueRequest::new("APP", "Authentication", "All sign-in work")
                .with_type(IssueType::Epic),
        )
        .await?;
    let story = service
        .create_issue(
            CreateIssueRequest::new("APP", "Add login", "Sign in")
                .with_type(IssueType::Story)
                .with_epic(epic.id().clone()),
        )
        .await?;
    let blocker = service
        .create_issue(CreateIssueRequest::new("APP", "Session store", "Redis"))
        .await?;

    let linked = service
        .link_issues(LinkIssuesRequest::new(
            LinkType::Blocking,
            blocker.id().clone(),
            story.id().clone(),
        ))
        .await?;
    eyre::ensure!(linked);

    let opened = apply(
        &service,
        &story,
        StateChangeCommand::Open {
            started_at: Utc::now(),
        },
    )
    .await?;

    eyre::ensure!(opened.epic_id() == Some(epic.id()));
    eyre::ensure!(opened.related_issues().contains(blocker.id()));
    Ok(())
}
