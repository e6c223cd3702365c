//! Status transitions and their history rows in `PostgreSQL`.

use super::helpers::{PgContext, admin, execute_sql, history_rows, pg, register};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::error::ErrorKind;
use tasktrack::task::{domain::TaskStatus, services::TaskDraft};

const REJECT_HISTORY_SQL: &str = "
CREATE FUNCTION reject_history() RETURNS trigger AS $$
BEGIN
    RAISE EXCEPTION 'history writes disabled';
END;
$$ LANGUAGE plpgsql;
CREATE TRIGGER reject_history BEFORE INSERT ON task_status_history
    FOR EACH ROW EXECUTE FUNCTION reject_history();
";

#[rstest]
fn transitions_persist_newest_first(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let task = state.tasks.create(alice, TaskDraft::titled("Migrate")).await?;

        for status in ["in_progress", "blocked", "in_progress", "done"] {
            state.tasks.change_status(alice, task.id(), status).await?;
        }
        let unchanged = state.tasks.change_status(alice, task.id(), "done").await?;
        ensure!(unchanged.status() == TaskStatus::Done, "same-status change");

        let history = state.tasks.history(alice, task.id()).await?;
        let targets: Vec<TaskStatus> = history.iter().map(|entry| entry.to_status()).collect();
        ensure!(
            targets
                == [
                    TaskStatus::Done,
                    TaskStatus::InProgress,
                    TaskStatus::Blocked,
                    TaskStatus::InProgress,
                ],
            "unexpected order {targets:?}"
        );
        ensure!(
            history.last().map(|entry| entry.from_status()) == Some(TaskStatus::New),
            "oldest entry must leave the initial status"
        );
        ensure!(history_rows(&ctx.pool, task.id()).await? == 4, "row count");
        Ok(())
    })
}

#[rstest]
fn failed_history_insert_rolls_back_status(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let task = state.tasks.create(alice, TaskDraft::titled("Atomic")).await?;
        execute_sql(&ctx.pool, REJECT_HISTORY_SQL).await?;

        let Err(failure) = state.tasks.change_status(alice, task.id(), "done").await else {
            bail!("transition succeeded without its history row");
        };
        ensure!(failure.kind() == ErrorKind::Internal, "got {failure}");

        let stored = state.tasks.get(task.id()).await?;
        ensure!(stored.status() == TaskStatus::New, "status was not rolled back");
        ensure!(stored.updated_at() == task.updated_at(), "updated_at moved");
        ensure!(history_rows(&ctx.pool, task.id()).await? == 0, "history written");
        Ok(())
    })
}

#[rstest]
fn rejected_changes_write_nothing(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let mallory = register(state, "mallory").await?;
        let root = admin(state, "root").await?;
        let task = state.tasks.create(alice, TaskDraft::titled("Guarded")).await?;

        let Err(bogus) = state.tasks.change_status(alice, task.id(), "archived").await else {
            bail!("unknown status accepted");
        };
        ensure!(bogus.kind() == ErrorKind::InvalidArgument, "got {bogus}");
        let Err(denied) = state.tasks.change_status(mallory, task.id(), "done").await else {
            bail!("stranger changed status");
        };
        ensure!(denied.kind() == ErrorKind::Forbidden, "got {denied}");
        ensure!(history_rows(&ctx.pool, task.id()).await? == 0, "history written");

        let moved = state.tasks.change_status(root, task.id(), "canceled").await?;
        ensure!(moved.status() == TaskStatus::Canceled, "admin bypass");
        let history = state.tasks.history(root, task.id()).await?;
        ensure!(
            history.first().map(|entry| entry.changed_by()) == Some(root.id()),
            "history must record the admin"
        );
        Ok(())
    })
}

#[rstest]
fn deleting_task_cascades_history(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let task = state.tasks.create(alice, TaskDraft::titled("Temporary")).await?;
        state.tasks.change_status(alice, task.id(), "done").await?;
        ensure!(history_rows(&ctx.pool, task.id()).await? == 1, "history row");

        state.tasks.delete(alice, task.id()).await?;
        ensure!(history_rows(&ctx.pool, task.id()).await? == 0, "history survived");
        let Err(missing) = state.tasks.get(task.id()).await else {
            bail!("deleted task still readable");
        };
        ensure!(missing.kind() == ErrorKind::NotFound, "got {missing}");
        Ok(())
    })
}
