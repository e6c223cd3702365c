//! Filter, sort and pagination model for task listings.

use super::{Priority, Task, TaskStatus};
use crate::identity::domain::UserId;
use crate::theme::domain::ThemeId;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Conjunctive task filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Status equality.
    pub status: Option<TaskStatus>,
    /// Theme equality.
    pub theme_id: Option<ThemeId>,
    /// Assignee equality.
    pub assignee_id: Option<UserId>,
    /// Creator equality.
    pub created_by: Option<UserId>,
    /// Priority equality.
    pub priority: Option<Priority>,
    /// Inclusive lower bound on the due date.
    pub due_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the due date.
    pub due_date_to: Option<NaiveDate>,
    /// Case-insensitive substring matched against title or description.
    pub text: Option<String>,
}

impl TaskFilter {
    /// Returns the search text when it is non-empty.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    /// Evaluates the filter against a task.
    ///
    /// Tasks without a due date never satisfy a due-date bound.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let equals = self.status.is_none_or(|status| task.status() == status)
            && self
                .theme_id
                .is_none_or(|theme| task.theme_id() == Some(theme))
            && self
                .assignee_id
                .is_none_or(|assignee| task.assignee_id() == Some(assignee))
            && self
                .created_by
                .is_none_or(|creator| task.created_by() == creator)
            && self
                .priority
                .is_none_or(|priority| task.priority() == priority);
        let due = self
            .due_date_from
            .is_none_or(|from| task.due_date().is_some_and(|due| due >= from))
            && self
                .due_date_to
                .is_none_or(|to| task.due_date().is_some_and(|due| due <= to));
        equals && due && self.matches_text(task)
    }

    fn matches_text(&self, task: &Task) -> bool {
        let Some(needle) = self.search_text().map(str::to_lowercase) else {
            return true;
        };
        task.title().as_str().to_lowercase().contains(&needle)
            || task
                .description()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
    }
}

/// Sortable task columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Due date; tasks without one sort as if later than every date.
    DueDate,
    /// Priority value.
    Priority,
    /// Status storage string.
    Status,
}

impl SortField {
    /// Parses a sort field, falling back to [`SortField::CreatedAt`] for
    /// anything outside the allow-list.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "due_date" => Self::DueDate,
            "priority" => Self::Priority,
            "status" => Self::Status,
            _ => Self::CreatedAt,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parses a sort order, falling back to [`SortOrder::Desc`].
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// A complete listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Row filter.
    pub filter: TaskFilter,
    /// Sort column.
    pub sort: SortField,
    /// Sort direction.
    pub order: SortOrder,
    /// Maximum number of items returned.
    pub limit: usize,
    /// Number of matching items skipped.
    pub offset: usize,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            filter: TaskFilter::default(),
            sort: SortField::default(),
            order: SortOrder::default(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl TaskQuery {
    /// Page size used when the caller gives none.
    pub const DEFAULT_LIMIT: usize = 100;

    /// Orders two tasks by the requested key, then by id ascending.
    ///
    /// Missing due dates follow `PostgreSQL` semantics: last when ascending,
    /// first when descending.
    #[must_use]
    pub fn compare(&self, left: &Task, right: &Task) -> Ordering {
        let by_key = match self.sort {
            SortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            SortField::DueDate => compare_nulls_high(left.due_date(), right.due_date()),
            SortField::Priority => left.priority().cmp(&right.priority()),
            SortField::Status => left.status().as_str().cmp(right.status().as_str()),
        };
        let directed = match self.order {
            SortOrder::Asc => by_key,
            SortOrder::Desc => by_key.reverse(),
        };
        directed.then_with(|| left.id().cmp(&right.id()))
    }
}

fn compare_nulls_high(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One page of a task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page.
    pub items: Vec<Task>,
    /// Number of tasks matching the filter before pagination.
    pub total: u64,
}
