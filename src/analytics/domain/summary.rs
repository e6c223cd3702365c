//! Task counts and the overdue tally.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskStatus};
use crate::theme::domain::ThemeId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Aggregate view of every stored task.
///
/// Only keys that occur are present; tasks without a theme or assignee are
/// absent from the corresponding map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    /// Task count per status.
    pub counts_by_status: BTreeMap<TaskStatus, u64>,
    /// Task count per referenced theme.
    pub counts_by_theme: BTreeMap<ThemeId, u64>,
    /// Task count per assignee.
    pub counts_by_assignee: BTreeMap<UserId, u64>,
    /// Open tasks whose due date is before `today`.
    pub overdue_count: u64,
}

impl AnalyticsSummary {
    /// Folds `tasks` into a summary relative to `today`.
    #[must_use]
    pub fn summarize<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Self {
        tasks.into_iter().fold(Self::default(), |mut summary, task| {
            *summary.counts_by_status.entry(task.status()).or_default() += 1;
            if let Some(theme) = task.theme_id() {
                *summary.counts_by_theme.entry(theme).or_default() += 1;
            }
            if let Some(assignee) = task.assignee_id() {
                *summary.counts_by_assignee.entry(assignee).or_default() += 1;
            }
            if task.is_overdue(today) {
                summary.overdue_count += 1;
            }
            summary
        })
    }

    /// Total number of tasks counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts_by_status.values().sum()
    }
}
