//! Given steps for task status transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasktrack::access::Actor;
use tasktrack::identity::domain::UserId;
use tasktrack::task::services::{TaskDraft, TaskUpdate};

#[given(r#"a task created by "{creator}""#)]
fn task_created_by(world: &mut TaskTransitionWorld, creator: String) -> Result<(), eyre::Report> {
    let actor = world.actor(&creator);
    let task = run_async(
        world
            .service
            .create(actor, TaskDraft::titled("Scenario task")),
    )
    .wrap_err("create task for transition scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#""{name}" is an administrator"#)]
fn is_administrator(world: &mut TaskTransitionWorld, name: String) {
    world.actors.insert(name, Actor::new(UserId::new(), true));
}

#[given(r#"the task is assigned to "{assignee}""#)]
fn task_assigned_to(world: &mut TaskTransitionWorld, assignee: String) -> Result<(), eyre::Report> {
    let assignee_id = world.actor(&assignee).id();
    let task = world.task()?.clone();
    let creator = world
        .actors
        .values()
        .copied()
        .find(|actor| actor.id() == task.created_by())
        .ok_or_else(|| eyre::eyre!("creator is not a scenario actor"))?;
    let update = TaskUpdate {
        assignee_id: Some(Some(assignee_id)),
        ..TaskUpdate::default()
    };
    let updated = run_async(world.service.update(creator, task.id(), update))
        .wrap_err("assign task in scenario setup")?;
    world.task = Some(updated);
    Ok(())
}

#[given(r#"the task has been moved to "{status}" by "{name}""#)]
fn task_has_been_moved(
    world: &mut TaskTransitionWorld,
    status: String,
    name: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name);
    let task_id = world.task()?.id();
    let moved = run_async(world.service.change_status(actor, task_id, &status))
        .wrap_err("change status in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}
