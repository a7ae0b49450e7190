//! In-memory integration tests for the issue repository contract.

use rstest::{fixture, rstest};
use triage::issue::{
    adapters::memory::InMemoryIssueRepository,
    domain::{
        ConcurrencyToken, Issue, IssueIdentifier, IssueNumber, ProjectCode, StateChangeCommand,
    },
    ports::{IssueRepository, IssueRepositoryError},
};

#[fixture]
fn repository() -> InMemoryIssueRepository {
    InMemoryIssueRepository::new()
}

fn issue(number: i64) -> Issue {
    Issue::new("APP", number, "Add login", "Users need to sign in").expect("valid issue")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_then_find_round_trips(repository: InMemoryIssueRepository) {
    let stored = issue(1);
    repository.store(&stored).await.expect("store should succeed");

    let found = repository
        .find_by_id(stored.id(), false)
        .await
        .expect("lookup should succeed");

    assert_eq!(found, Some(stored));
    assert_eq!(repository.len().expect("len should succeed"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifier(repository: InMemoryIssueRepository) {
    repository.store(&issue(1)).await.expect("store should succeed");

    let result = repository.store(&issue(1)).await;

    assert!(matches!(result, Err(IssueRepositoryError::DuplicateIssue(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_with_loaded_token_succeeds(repository: InMemoryIssueRepository) {
    let original = issue(1);
    repository.store(&original).await.expect("store should succeed");

    let mut loaded = repository
        .find_by_id(original.id(), true)
        .await
        .expect("lookup should succeed")
        .expect("issue should exist");
    let expected = loaded.concurrency_token();
    assert!(loaded.execute(&StateChangeCommand::ToDo));
    repository
        .save(&loaded, expected)
        .await
        .expect("save should succeed");

    let reloaded = repository
        .find_by_id(original.id(), false)
        .await
        .expect("lookup should succeed")
        .expect("issue should exist");
    assert_eq!(reloaded.concurrency_token(), loaded.concurrency_token());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_detects_lost_update(repository: InMemoryIssueRepository) {
    let original = issue(1);
    repository.store(&original).await.expect("store should succeed");
    let token = original.concurrency_token();

    let mut first = original.clone();
    let mut second = original.clone();
    assert!(first.execute(&StateChangeCommand::ToDo));
    assert!(!second.execute(&StateChangeCommand::MoveToBacklog));
    assert!(second.execute(&StateChangeCommand::ToDo));

    repository
        .save(&first, token)
        .await
        .expect("first writer should win");
    let result = repository.save(&second, token).await;

    let Err(IssueRepositoryError::Conflict {
        expected, actual, ..
    }) = result
    else {
        panic!("expected conflict, got {result:?}");
    };
    assert_eq!(expected, token);
    assert_eq!(actual, first.concurrency_token());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_reports_missing_issue(repository: InMemoryIssueRepository) {
    let result = repository.save(&issue(7), ConcurrencyToken::new()).await;

    assert!(matches!(result, Err(IssueRepositoryError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_numbers_are_never_reused(repository: InMemoryIssueRepository) {
    let project = ProjectCode::new("APP").expect("valid project");
    let first = repository
        .next_issue_number(&project)
        .await
        .expect("number should be assigned");
    let stored = Issue::with_identifier(
        IssueIdentifier::new(project.clone(), first),
        "Add login",
        "",
    )
    .expect("valid issue");
    repository.store(&stored).await.expect("store should succeed");
    assert!(repository.delete(stored.id()).await.expect("delete should succeed"));

    let second = repository
        .next_issue_number(&project)
        .await
        .expect("number should be assigned");

    assert_eq!(first, IssueNumber::FIRST);
    assert_eq!(second.value(), 2);
    assert!(repository.is_empty().expect("is_empty should succeed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_writers_with_same_token_admit_one(repository: InMemoryIssueRepository) {
    let original = issue(1);
    repository.store(&original).await.expect("store should succeed");
    let token = original.concurrency_token();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let writer = repository.clone();
        let mut copy = original.clone();
        handles.push(tokio::spawn(async move {
            assert!(copy.execute(&StateChangeCommand::ToDo));
            writer.save(&copy, token).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("writer task should not panic") {
            Ok(()) => successes += 1,
            Err(IssueRepositoryError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 7);
}
