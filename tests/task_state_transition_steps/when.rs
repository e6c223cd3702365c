//! When steps for task status transition BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{name}" changes the status to "{status}""#)]
fn change_status(
    world: &mut TaskTransitionWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let actor = world.actor(&name);
    let task_id = world.task()?.id();
    let result = run_async(world.service.change_status(actor, task_id, &status));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}
