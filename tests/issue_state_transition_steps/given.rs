//! Given steps for issue lifecycle BDD scenarios.

use super::world::{IssueTransitionWorld, command_named, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use triage::issue::{
    domain::{ClosureReason, StateChangeCommand},
    services::{ChangeIssueStateRequest, CreateIssueRequest},
};

#[given(r#"a new issue "{title}" in project "{project}""#)]
fn new_issue(
    world: &mut IssueTransitionWorld,
    title: String,
    project: String,
) -> Result<(), eyre::Report> {
    let request = CreateIssueRequest::new(project, title, "Raised from a behaviour scenario");
    let created =
        run_async(world.service.create_issue(request)).wrap_err("create issue for scenario")?;
    world.current_issue = Some(created);
    Ok(())
}

#[given(r#"the issue has received the "{command}" command"#)]
fn issue_received_command(
    world: &mut IssueTransitionWorld,
    command: String,
) -> Result<(), eyre::Report> {
    let id = world.issue()?.id().clone();
    let request = ChangeIssueStateRequest::new(id, command_named(&command)?);
    let updated = run_async(world.service.change_state(request))
        .wrap_err_with(|| format!("apply {command} in scenario setup"))?;
    world.current_issue = Some(updated);
    Ok(())
}

#[given(r#"the issue has been closed as "{reason}""#)]
fn issue_closed_as(world: &mut IssueTransitionWorld, reason: String) -> Result<(), eyre::Report> {
    let id = world.issue()?.id().clone();
    let closure = ClosureReason::try_from(reason.as_str())?;
    let request = ChangeIssueStateRequest::new(id, StateChangeCommand::close(closure));
    let updated =
        run_async(world.service.change_state(request)).wrap_err("close issue in scenario setup")?;
    world.current_issue = Some(updated);
    Ok(())
}
