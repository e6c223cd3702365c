//! Theme constraints and task detaching in `PostgreSQL`.

use super::helpers::{PgContext, admin, pg, register};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::error::ErrorKind;
use tasktrack::identity::services::RegisterRequest;
use tasktrack::task::services::TaskDraft;
use tasktrack::theme::services::ThemeDraft;

#[rstest]
fn unique_constraints_surface_as_invalid_argument(
    pg: eyre::Result<PgContext>,
) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let root = admin(state, "root").await?;
        let ops = ThemeDraft {
            name: "Ops".to_owned(),
            description: None,
        };
        state.themes.create(root, ops.clone()).await?;
        let Err(duplicate) = state.themes.create(root, ops).await else {
            bail!("duplicate theme accepted");
        };
        ensure!(duplicate.kind() == ErrorKind::InvalidArgument, "got {duplicate}");

        register(state, "alice").await?;
        let Err(taken) = state
            .accounts
            .register(RegisterRequest::new("ALICE@example.com", "other", "password123"))
            .await
        else {
            bail!("duplicate email accepted");
        };
        ensure!(taken.kind() == ErrorKind::InvalidArgument, "got {taken}");
        Ok(())
    })
}

#[rstest]
fn deleting_theme_keeps_tasks(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let root = admin(state, "root").await?;
        let alice = register(state, "alice").await?;
        let theme = state
            .themes
            .create(
                root,
                ThemeDraft {
                    name: "Infra".to_owned(),
                    description: Some("Servers".to_owned()),
                },
            )
            .await?;
        let task = state
            .tasks
            .create(
                alice,
                TaskDraft {
                    theme_id: Some(theme.id()),
                    ..TaskDraft::titled("Patch hosts")
                },
            )
            .await?;

        state.themes.delete(root, theme.id()).await?;
        let stored = state.tasks.get(task.id()).await?;
        ensure!(stored.theme_id().is_none(), "theme reference survived");
        Ok(())
    })
}
