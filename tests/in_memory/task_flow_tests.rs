//! Transitions, history and the authorization gate through the wired
//! services.

use super::helpers::{admin, register, state};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::error::ErrorKind;
use tasktrack::http::AppState;
use tasktrack::task::{
    domain::TaskStatus,
    services::{TaskDraft, TaskUpdate},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_records_each_change_newest_first(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let task = state
        .tasks
        .create(alice, TaskDraft::titled("Write report"))
        .await?;
    ensure!(task.status() == TaskStatus::New, "new tasks start as new");
    ensure!(task.priority().value() == 3, "default priority is 3");

    for status in ["in_progress", "blocked", "in_progress", "done"] {
        state.tasks.change_status(alice, task.id(), status).await?;
    }

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
    for pair in history.windows(2) {
        let [newer, older] = pair else {
            bail!("windows(2) yields pairs");
        };
        ensure!(newer.from_status() == older.to_status(), "history chain broken");
        ensure!(newer.changed_at() >= older.changed_at(), "history not newest first");
    }

    let stored = state.tasks.get(task.id()).await?;
    ensure!(
        history.first().map(|entry| entry.changed_at()) == Some(stored.updated_at()),
        "updated_at must match the latest change"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_access_is_asymmetric(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    let carol = register(&state, "carol").await;
    let draft = TaskDraft {
        assignee_id: Some(bob.id()),
        ..TaskDraft::titled("Shared work")
    };
    let task = state.tasks.create(alice, draft).await?;
    state.tasks.change_status(alice, task.id(), "in_progress").await?;

    ensure!(
        state.tasks.history(bob, task.id()).await?.len() == 1,
        "assignee must see history"
    );
    let Err(denied) = state.tasks.change_status(bob, task.id(), "done").await else {
        bail!("assignee changed status");
    };
    ensure!(denied.kind() == ErrorKind::Forbidden, "got {denied}");

    let Err(hidden) = state.tasks.history(carol, task.id()).await else {
        bail!("stranger read history");
    };
    ensure!(hidden.kind() == ErrorKind::Forbidden, "got {hidden}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admins_bypass_ownership(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let root = admin(&state, "root").await;
    let task = state.tasks.create(alice, TaskDraft::titled("Audit")).await?;

    state.tasks.change_status(root, task.id(), "canceled").await?;
    let history = state.tasks.history(root, task.id()).await?;
    ensure!(
        history.first().map(|entry| entry.changed_by()) == Some(root.id()),
        "admin must be recorded as the actor"
    );

    let update = TaskUpdate {
        title: Some("Audited".to_owned()),
        ..TaskUpdate::default()
    };
    let updated = state.tasks.update(root, task.id(), update).await?;
    ensure!(updated.title().as_str() == "Audited", "admin update lost");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_changes_leave_no_trace(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let mallory = register(&state, "mallory").await;
    let task = state.tasks.create(alice, TaskDraft::titled("Guarded")).await?;

    let bogus = state.tasks.change_status(alice, task.id(), "archived").await;
    ensure!(
        bogus.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::InvalidArgument),
        "unknown status must be an invalid argument"
    );
    let forbidden = state.tasks.change_status(mallory, task.id(), "done").await;
    ensure!(
        forbidden.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Forbidden),
        "stranger must be forbidden"
    );
    let same = state.tasks.change_status(alice, task.id(), "new").await?;
    ensure!(same.updated_at() == task.updated_at(), "no-op touched the task");

    ensure!(
        state.tasks.get(task.id()).await? == task,
        "task changed after rejected requests"
    );
    ensure!(
        state.tasks.history(alice, task.id()).await?.is_empty(),
        "history written by rejected requests"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_task_removes_history(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let task = state.tasks.create(alice, TaskDraft::titled("Temporary")).await?;
    state.tasks.change_status(alice, task.id(), "done").await?;

    state.tasks.delete(alice, task.id()).await?;

    let Err(err) = state.tasks.history(alice, task.id()).await else {
        bail!("history of a deleted task is still readable");
    };
    ensure!(err.kind() == ErrorKind::NotFound, "got {err}");
    Ok(())
}
