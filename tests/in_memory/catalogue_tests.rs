//! Theme administration and its effect on referencing tasks.

use super::helpers::{admin, register, state};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::error::ErrorKind;
use tasktrack::http::AppState;
use tasktrack::task::services::TaskDraft;
use tasktrack::theme::{domain::ThemeId, services::ThemeDraft};

fn draft(name: &str) -> ThemeDraft {
    ThemeDraft {
        name: name.to_owned(),
        description: None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_admins_manage_themes(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let root = admin(&state, "root").await;

    let Err(denied) = state.themes.create(alice, draft("Ops")).await else {
        bail!("regular user created a theme");
    };
    ensure!(denied.kind() == ErrorKind::Forbidden, "got {denied}");

    let theme = state.themes.create(root, draft("Ops")).await?;
    ensure!(state.themes.get(theme.id()).await? == theme, "theme not stored");

    let Err(duplicate) = state.themes.create(root, draft("Ops")).await else {
        bail!("duplicate theme name accepted");
    };
    ensure!(duplicate.kind() == ErrorKind::InvalidArgument, "got {duplicate}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn themes_list_by_name(state: AppState) -> eyre::Result<()> {
    let root = admin(&state, "root").await;
    for name in ["Zeta", "Alpha", "Mu"] {
        state.themes.create(root, draft(name)).await?;
    }
    let names: Vec<String> = state
        .themes
        .list(2, 0)
        .await?
        .iter()
        .map(|theme| theme.name().as_str().to_owned())
        .collect();
    ensure!(names == ["Alpha", "Mu"], "unexpected page {names:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_theme_detaches_tasks(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let root = admin(&state, "root").await;
    let theme = state.themes.create(root, draft("Ops")).await?;
    let task = state
        .tasks
        .create(
            alice,
            TaskDraft {
                theme_id: Some(theme.id()),
                ..TaskDraft::titled("Themed")
            },
        )
        .await?;

    state.themes.delete(root, theme.id()).await?;

    let stored = state.tasks.get(task.id()).await?;
    ensure!(stored.theme_id().is_none(), "theme reference survived deletion");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_cannot_reference_missing_theme(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let draft = TaskDraft {
        theme_id: Some(ThemeId::new()),
        ..TaskDraft::titled("Dangling")
    };
    let Err(err) = state.tasks.create(alice, draft).await else {
        bail!("dangling theme accepted");
    };
    ensure!(err.kind() == ErrorKind::NotFound, "got {err}");
    Ok(())
}
