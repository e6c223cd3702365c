//! Filtering, sorting, pagination and analytics over the wired services.

use super::helpers::{register, state};
use chrono::{Duration, Utc};
use eyre::ensure;
use rstest::rstest;
use tasktrack::http::AppState;
use tasktrack::task::{
    domain::{SortField, SortOrder, TaskFilter, TaskQuery, TaskStatus},
    services::TaskDraft,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_combine_and_total_ignores_pagination(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let bob = register(&state, "bob").await;
    for (title, priority) in [("Fix login", 1), ("Fix logout", 2), ("Write docs", 1)] {
        let draft = TaskDraft {
            priority: Some(priority),
            ..TaskDraft::titled(title)
        };
        state.tasks.create(alice, draft).await?;
    }
    state.tasks.create(bob, TaskDraft::titled("Fix build")).await?;

    let query = TaskQuery {
        filter: TaskFilter {
            created_by: Some(alice.id()),
            text: Some("FIX".to_owned()),
            ..TaskFilter::default()
        },
        sort: SortField::Priority,
        order: SortOrder::Asc,
        limit: 1,
        offset: 0,
    };
    let page = state.tasks.list(&query).await?;
    ensure!(page.total == 2, "total was {}", page.total);
    ensure!(page.items.len() == 1, "limit not applied");
    ensure!(
        page.items.first().map(|task| task.title().as_str()) == Some("Fix login"),
        "wrong first item"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filter_tracks_transitions(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let moving = state.tasks.create(alice, TaskDraft::titled("Moving")).await?;
    state.tasks.create(alice, TaskDraft::titled("Idle")).await?;
    state.tasks.change_status(alice, moving.id(), "in_progress").await?;

    let query = TaskQuery {
        filter: TaskFilter {
            status: Some(TaskStatus::InProgress),
            ..TaskFilter::default()
        },
        ..TaskQuery::default()
    };
    let page = state.tasks.list(&query).await?;
    let ids: Vec<_> = page.items.iter().map(|task| task.id()).collect();
    ensure!(ids == [moving.id()], "unexpected matches {ids:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_statuses_and_overdue(state: AppState) -> eyre::Result<()> {
    let alice = register(&state, "alice").await;
    let last_week = Utc::now().date_naive() - Duration::days(7);
    let overdue = TaskDraft {
        due_date: Some(last_week),
        assignee_id: Some(alice.id()),
        ..TaskDraft::titled("Late")
    };
    let finished = TaskDraft {
        due_date: Some(last_week),
        ..TaskDraft::titled("Late but done")
    };
    state.tasks.create(alice, overdue).await?;
    let done = state.tasks.create(alice, finished).await?;
    state.tasks.create(alice, TaskDraft::titled("Open")).await?;
    state.tasks.change_status(alice, done.id(), "done").await?;

    let summary = state.analytics.summary().await?;
    ensure!(summary.overdue_count == 1, "overdue was {}", summary.overdue_count);
    ensure!(
        summary.counts_by_status.get(&TaskStatus::New) == Some(&2),
        "new count wrong: {:?}",
        summary.counts_by_status
    );
    ensure!(
        summary.counts_by_assignee.get(&alice.id()) == Some(&1),
        "assignee count wrong"
    );
    ensure!(summary.counts_by_theme.is_empty(), "no themes were referenced");
    Ok(())
}
