//! Filtering, search, paging and analytics over SQL.

use super::helpers::{PgContext, admin, pg, register};
use chrono::{Duration, Utc};
use eyre::ensure;
use rstest::rstest;
use tasktrack::task::{
    domain::{SortField, SortOrder, TaskFilter, TaskQuery, TaskStatus},
    services::TaskDraft,
};
use tasktrack::theme::services::ThemeDraft;

#[rstest]
fn search_treats_wildcards_literally(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let literal = state
            .tasks
            .create(alice, TaskDraft::titled("Reach 100% coverage"))
            .await?;
        state.tasks.create(alice, TaskDraft::titled("Reach 1000 users")).await?;

        let query = TaskQuery {
            filter: TaskFilter {
                text: Some("0%".to_owned()),
                ..TaskFilter::default()
            },
            ..TaskQuery::default()
        };
        let page = state.tasks.list(&query).await?;
        let ids: Vec<_> = page.items.iter().map(|task| task.id()).collect();
        ensure!(ids == [literal.id()], "unexpected matches {ids:?}");
        ensure!(page.total == 1, "total {}", page.total);
        Ok(())
    })
}

#[rstest]
fn due_date_sort_puts_undated_last(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let today = Utc::now().date_naive();
        for (title, due) in [
            ("Later", Some(today + Duration::days(10))),
            ("Undated", None),
            ("Sooner", Some(today + Duration::days(1))),
        ] {
            let draft = TaskDraft {
                due_date: due,
                ..TaskDraft::titled(title)
            };
            state.tasks.create(alice, draft).await?;
        }

        let query = TaskQuery {
            sort: SortField::DueDate,
            order: SortOrder::Asc,
            ..TaskQuery::default()
        };
        let titles: Vec<String> = state
            .tasks
            .list(&query)
            .await?
            .items
            .iter()
            .map(|task| task.title().as_str().to_owned())
            .collect();
        ensure!(titles == ["Sooner", "Later", "Undated"], "order {titles:?}");
        Ok(())
    })
}

#[rstest]
#[case(usize::MAX, 0, 2)]
#[case(1, usize::MAX, 0)]
#[case(usize::MAX, usize::MAX, 0)]
fn oversized_page_bounds_are_clamped(
    pg: eyre::Result<PgContext>,
    #[case] limit: usize,
    #[case] offset: usize,
    #[case] expected_items: usize,
) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let root = admin(state, "root").await?;
        for title in ["First", "Second"] {
            state.tasks.create(alice, TaskDraft::titled(title)).await?;
            let theme = ThemeDraft {
                name: title.to_owned(),
                description: None,
            };
            state.themes.create(root, theme).await?;
        }

        let query = TaskQuery {
            limit,
            offset,
            ..TaskQuery::default()
        };
        let page = state.tasks.list(&query).await?;
        ensure!(page.items.len() == expected_items, "items {}", page.items.len());
        ensure!(page.total == 2, "total {}", page.total);

        let themes = state.themes.list(limit, offset).await?;
        ensure!(themes.len() == expected_items, "themes {}", themes.len());
        Ok(())
    })
}

#[rstest]
fn summary_reads_sql_rows(pg: eyre::Result<PgContext>) -> eyre::Result<()> {
    let ctx = pg?;
    let state = &ctx.state;
    ctx.block_on(async {
        let alice = register(state, "alice").await?;
        let overdue = TaskDraft {
            due_date: Some(Utc::now().date_naive() - Duration::days(3)),
            ..TaskDraft::titled("Late")
        };
        state.tasks.create(alice, overdue).await?;
        let finished = state.tasks.create(alice, TaskDraft::titled("Finished")).await?;
        state.tasks.change_status(alice, finished.id(), "done").await?;

        let summary = state.analytics.summary().await?;
        ensure!(summary.total() == 2, "total {}", summary.total());
        ensure!(
            summary.counts_by_status.get(&TaskStatus::Done) == Some(&1),
            "{summary:?}"
        );
        ensure!(summary.overdue_count == 1, "overdue {}", summary.overdue_count);
        ensure!(
            summary.counts_by_assignee.is_empty(),
            "no assignees were set: {summary:?}"
        );
        Ok(())
    })
}
