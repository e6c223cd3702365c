//! Diesel row models for theme persistence.

use super::schema::themes;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for theme records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThemeRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for theme records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = themes)]
#[diesel(treat_none_as_null = true)]
pub struct ThemeRecord {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
