//! Diesel row models for task and status history persistence.

use super::schema::{task_status_history, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: i32,
    pub theme_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub created_by: uuid::Uuid,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: i32,
    pub theme_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub created_by: uuid::Uuid,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the editable task fields. Status is excluded.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskFieldsChangeset {
    pub title: String,
    pub description: Option<String>,
    pub priority: i32,
    pub theme_id: Option<uuid::Uuid>,
    pub assignee_id: Option<uuid::Uuid>,
    pub due_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: uuid::Uuid,
    pub changed_at: DateTime<Utc>,
}

/// Insert model for history entries; `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_status_history)]
pub struct NewHistoryRow {
    pub id: uuid::Uuid,
    pub task_id: uuid::Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: uuid::Uuid,
    pub changed_at: DateTime<Utc>,
}
