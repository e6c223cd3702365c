//! `PostgreSQL` repository implementation for tasks and status history.

use super::{
    models::{HistoryRow, NewHistoryRow, NewTaskRow, TaskFieldsChangeset, TaskRow},
    schema::{task_status_history, tasks},
};
use crate::identity::domain::UserId;
use crate::persistence::{PgPool, get_conn_with, run_blocking_with, sql_bound};
use crate::task::{
    domain::{
        HistoryEntryId, PersistedHistoryData, PersistedTaskData, Priority, SortField,
        SortOrder, StatusHistoryEntry, Task, TaskFilter, TaskId, TaskPage, TaskQuery,
        TaskStatus, TaskTitle,
    },
    ports::{
        StatusTransition, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TransitionOutcome,
    },
};
use crate::theme::{
    domain::ThemeId,
    ports::{ThemeReferences, ThemeRepositoryError, ThemeRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, TaskRepositoryError::persistence)?;
                f(&mut connection)
            },
            TaskRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    other => TaskRepositoryError::persistence(other),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        // History rows go with the task through ON DELETE CASCADE.
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let request = query.clone();
        let limit = sql_bound(request.limit);
        let offset = sql_bound(request.offset);
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, TaskRepositoryError, _>(|tx| {
                    let total: i64 = filtered(&request.filter).count().get_result(tx)?;
                    let rows = ordered(filtered(&request.filter), request.sort, request.order)
                        .limit(limit)
                        .offset(offset)
                        .select(TaskRow::as_select())
                        .load::<TaskRow>(tx)?;
                    let items = rows
                        .into_iter()
                        .map(row_to_task)
                        .collect::<TaskRepositoryResult<Vec<_>>>()?;
                    let count =
                        u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
                    Ok(TaskPage {
                        items,
                        total: count,
                    })
                })
        })
        .await
    }

    async fn all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn apply_transition(
        &self,
        transition: StatusTransition,
    ) -> TaskRepositoryResult<TransitionOutcome> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let row = tasks::table
                    .find(transition.task_id.into_inner())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(transition.task_id))?;
                let mut task = row_to_task(row)?;

                let Some(entry) =
                    task.transition(transition.to_status, transition.actor, transition.at)
                else {
                    return Ok(TransitionOutcome { task, entry: None });
                };

                diesel::update(tasks::table.find(task.id().into_inner()))
                    .set((
                        tasks::status.eq(task.status().as_str()),
                        tasks::updated_at.eq(task.updated_at()),
                    ))
                    .execute(tx)?;
                diesel::insert_into(task_status_history::table)
                    .values(&to_history_row(&entry))
                    .execute(tx)?;

                Ok(TransitionOutcome {
                    task,
                    entry: Some(entry),
                })
            })
        })
        .await
    }

    async fn history(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<StatusHistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_status_history::table
                .filter(task_status_history::task_id.eq(task_id.into_inner()))
                .order((
                    task_status_history::changed_at.desc(),
                    task_status_history::seq.desc(),
                ))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

#[async_trait]
impl ThemeReferences for PostgresTaskRepository {
    async fn detach_theme(&self, id: ThemeId) -> ThemeRepositoryResult<usize> {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ThemeRepositoryError::persistence)?;
                diesel::update(tasks::table.filter(tasks::theme_id.eq(id.into_inner())))
                    .set(tasks::theme_id.eq(None::<uuid::Uuid>))
                    .execute(&mut connection)
                    .map_err(ThemeRepositoryError::persistence)
            },
            ThemeRepositoryError::persistence,
        )
        .await
    }
}

fn filtered(filter: &TaskFilter) -> tasks::BoxedQuery<'static, Pg> {
    let mut query = tasks::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(tasks::status.eq(status.as_str()));
    }
    if let Some(theme_id) = filter.theme_id {
        query = query.filter(tasks::theme_id.eq(theme_id.into_inner()));
    }
    if let Some(assignee_id) = filter.assignee_id {
        query = query.filter(tasks::assignee_id.eq(assignee_id.into_inner()));
    }
    if let Some(created_by) = filter.created_by {
        query = query.filter(tasks::created_by.eq(created_by.into_inner()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(tasks::priority.eq(i32::from(priority.value())));
    }
    if let Some(from) = filter.due_date_from {
        query = query.filter(tasks::due_date.ge(from));
    }
    if let Some(to) = filter.due_date_to {
        query = query.filter(tasks::due_date.le(to));
    }
    if let Some(text) = filter.search_text() {
        let pattern = format!("%{}%", escape_like(text));
        query = query.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.assume_not_null().ilike(pattern)),
        );
    }
    query
}

fn ordered(
    query: tasks::BoxedQuery<'static, Pg>,
    sort: SortField,
    order: SortOrder,
) -> tasks::BoxedQuery<'static, Pg> {
    let sorted = match (sort, order) {
        (SortField::CreatedAt, SortOrder::Asc) => query.order_by(tasks::created_at.asc()),
        (SortField::CreatedAt, SortOrder::Desc) => query.order_by(tasks::created_at.desc()),
        (SortField::DueDate, SortOrder::Asc) => query.order_by(tasks::due_date.asc()),
        (SortField::DueDate, SortOrder::Desc) => query.order_by(tasks::due_date.desc()),
        (SortField::Priority, SortOrder::Asc) => query.order_by(tasks::priority.asc()),
        (SortField::Priority, SortOrder::Desc) => query.order_by(tasks::priority.desc()),
        (SortField::Status, SortOrder::Asc) => query.order_by(tasks::status.asc()),
        (SortField::Status, SortOrder::Desc) => query.order_by(tasks::status.desc()),
    };
    sorted.then_order_by(tasks::id.asc())
}

/// Escapes `LIKE` wildcards so search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        status: task.status().as_str().to_owned(),
        priority: i32::from(task.priority().value()),
        theme_id: task.theme_id().map(ThemeId::into_inner),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        created_by: task.created_by().into_inner(),
        due_date: task.due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskFieldsChangeset {
    TaskFieldsChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        priority: i32::from(task.priority().value()),
        theme_id: task.theme_id().map(ThemeId::into_inner),
        assignee_id: task.assignee_id().map(UserId::into_inner),
        due_date: task.due_date(),
        updated_at: task.updated_at(),
    }
}

fn to_history_row(entry: &StatusHistoryEntry) -> NewHistoryRow {
    NewHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        from_status: entry.from_status().as_str().to_owned(),
        to_status: entry.to_status().as_str().to_owned(),
        changed_by: entry.changed_by().into_inner(),
        changed_at: entry.changed_at(),
    }
}

fn parse_status(value: &str) -> TaskRepositoryResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        theme_id,
        assignee_id,
        created_by,
        due_date,
        created_at,
        updated_at,
    } = row;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        status: parse_status(&status)?,
        priority: Priority::new(i64::from(priority)).map_err(TaskRepositoryError::persistence)?,
        theme_id: theme_id.map(ThemeId::from_uuid),
        assignee_id: assignee_id.map(UserId::from_uuid),
        created_by: UserId::from_uuid(created_by),
        due_date,
        created_at,
        updated_at,
    }))
}

fn row_to_entry(row: HistoryRow) -> TaskRepositoryResult<StatusHistoryEntry> {
    Ok(StatusHistoryEntry::from_persisted(PersistedHistoryData {
        id: HistoryEntryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        from_status: parse_status(&row.from_status)?,
        to_status: parse_status(&row.to_status)?,
        changed_by: UserId::from_uuid(row.changed_by),
        changed_at: row.changed_at,
    }))
}
