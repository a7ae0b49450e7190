//! Then steps for issue lifecycle BDD scenarios.

use super::world::{IssueTransitionWorld, run_async};
use rstest_bdd_macros::then;
use triage::issue::{domain::IssueState, services::IssueServiceError};

fn expected_state(state: &str) -> Result<IssueState, eyre::Report> {
    IssueState::try_from(state).map_err(|err| eyre::eyre!("invalid expected state: {err}"))
}

#[then(r#"the issue state is "{state}""#)]
fn issue_state_is(world: &IssueTransitionWorld, state: String) -> Result<(), eyre::Report> {
    let expected = expected_state(&state)?;
    let actual = world.issue()?.state();

    if actual != expected {
        return Err(eyre::eyre!("expected state {expected}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the stored issue state is "{state}""#)]
fn stored_issue_state_is(world: &IssueTransitionWorld, state: String) -> Result<(), eyre::Report> {
    let expected = expected_state(&state)?;
    let id = world.issue()?.id().clone();
    let stored = run_async(world.service.find_issue(&id))?
        .ok_or_else(|| eyre::eyre!("issue {id} missing from repository"))?;

    if stored.state() != expected {
        return Err(eyre::eyre!(
            "expected stored state {expected}, found {}",
            stored.state()
        ));
    }
    Ok(())
}

#[then("the command is rejected as an invalid state transition")]
fn command_rejected(world: &IssueTransitionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_command_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing command result"))?;

    if !matches!(result, Err(IssueServiceError::InvalidStateTransition { .. })) {
        return Err(eyre::eyre!(
            "expected InvalidStateTransition error, got {result:?}"
        ));
    }
    Ok(())
}
