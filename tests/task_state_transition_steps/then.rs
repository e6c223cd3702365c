//! Then steps for task status transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use rstest_bdd_macros::then;
use tasktrack::error::ErrorKind;
use tasktrack::task::{domain::TaskStatus, ports::TaskRepository};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.service.get(task_id))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("the history length is {count:usize}")]
fn history_length_is(world: &TaskTransitionWorld, count: usize) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let history = run_async(world.repository.history(task_id))?;
    if history.len() != count {
        return Err(eyre::eyre!(
            "expected {count} history entries, found {}",
            history.len()
        ));
    }
    Ok(())
}

#[then(r#"the latest history entry moves from "{from}" to "{to}" by "{name}""#)]
fn latest_entry_moves(
    world: &TaskTransitionWorld,
    from: String,
    to: String,
    name: String,
) -> Result<(), eyre::Report> {
    let actor = world
        .actors
        .get(&name)
        .copied()
        .ok_or_else(|| eyre::eyre!("unknown actor {name}"))?;
    let task_id = world.task()?.id();
    let history = run_async(world.repository.history(task_id))?;
    let latest = history
        .first()
        .ok_or_else(|| eyre::eyre!("history is empty"))?;

    let observed = (
        latest.from_status().as_str(),
        latest.to_status().as_str(),
        latest.changed_by(),
    );
    if observed != (from.as_str(), to.as_str(), actor.id()) {
        return Err(eyre::eyre!(
            "expected {from} -> {to} by {name}, found {observed:?}"
        ));
    }
    Ok(())
}

#[then(r#"the change fails with "{kind}""#)]
fn change_fails_with(world: &TaskTransitionWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = match kind.as_str() {
        "invalid_argument" => ErrorKind::InvalidArgument,
        "forbidden" => ErrorKind::Forbidden,
        "not_found" => ErrorKind::NotFound,
        other => return Err(eyre::eyre!("unsupported error kind {other}")),
    };
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing status change result"))?;

    match result {
        Err(err) if err.kind() == expected => Ok(()),
        other => Err(eyre::eyre!("expected {kind} failure, got {other:?}")),
    }
}
