//! Behaviour tests for issue lifecycle command dispatch.

#[path = "issue_state_transition_steps/mod.rs"]
mod issue_state_transition_steps_defs;

use issue_state_transition_steps_defs::world::{IssueTransitionWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/issue_state_transitions.feature",
    name = "Open a new issue"
)]
#[tokio::test(flavor = "multi_thread")]
async fn open_new_issue(world: IssueTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_state_transitions.feature",
    name = "Reject closing an issue that is in progress"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_close_in_progress(world: IssueTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_state_transitions.feature",
    name = "Failed test sends work back through review"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failed_test_returns_to_review(world: IssueTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_state_transitions.feature",
    name = "Close a non-reproducible defect as deferred"
)]
#[tokio::test(flavor = "multi_thread")]
async fn close_cannot_reproduce_as_deferred(world: IssueTransitionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/issue_state_transitions.feature",
    name = "Reopen a resolved issue"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reopen_resolved_issue(world: IssueTransitionWorld) {
    let _ = world;
}
