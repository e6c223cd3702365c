//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: uuid::Uuid,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserRecord {
    pub id: uuid::Uuid,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
