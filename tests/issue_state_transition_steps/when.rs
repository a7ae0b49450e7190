//! When steps for issue lifecycle BDD scenarios.

use super::world::{IssueTransitionWorld, command_named, run_async};
use rstest_bdd_macros::when;
use triage::issue::{
    domain::{ClosureReason, StateChangeCommand},
    services::ChangeIssueStateRequest,
};

fn apply(
    world: &mut IssueTransitionWorld,
    command: StateChangeCommand,
) -> Result<(), eyre::Report> {
    let id = world.issue()?.id().clone();
    let result = run_async(
        world
            .service
            .change_state(ChangeIssueStateRequest::new(id, command)),
    );
    if let Ok(ref updated) = result {
        world.current_issue = Some(updated.clone());
    }
    world.last_command_result = Some(result);
    Ok(())
}

#[when(r#"the "{command}" command is applied"#)]
fn command_applied(world: &mut IssueTransitionWorld, command: String) -> Result<(), eyre::Report> {
    apply(world, command_named(&command)?)
}

#[when(r#"the issue is closed as "{reason}""#)]
fn issue_is_closed(world: &mut IssueTransitionWorld, reason: String) -> Result<(), eyre::Report> {
    let closure = ClosureReason::try_from(reason.as_str())?;
    apply(world, StateChangeCommand::close(closure))
}
