//! `PostgreSQL` repository implementation for theme storage.

use super::{
    models::{ThemeRecord, ThemeRow},
    schema::themes,
};
use crate::persistence::{PgPool, get_conn_with, run_blocking_with, sql_bound};
use crate::theme::{
    domain::{PersistedThemeData, Theme, ThemeId, ThemeName},
    ports::{ThemeRepository, ThemeRepositoryError, ThemeRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed theme repository.
#[derive(Debug, Clone)]
pub struct PostgresThemeRepository {
    pool: PgPool,
}

impl PostgresThemeRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ThemeRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ThemeRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, ThemeRepositoryError::persistence)?;
                f(&mut connection)
            },
            ThemeRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl ThemeRepository for PostgresThemeRepository {
    async fn store(&self, theme: &Theme) -> ThemeRepositoryResult<()> {
        let record = to_record(theme);
        let name = theme.name().clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(themes::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, theme: &Theme) -> ThemeRepositoryResult<()> {
        let record = to_record(theme);
        let name = theme.name().clone();
        let id = theme.id();
        self.run_blocking(move |connection| {
            let updated = diesel::update(themes::table.filter(themes::id.eq(id.into_inner())))
                .set(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &name))?;
            if updated == 0 {
                return Err(ThemeRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ThemeId) -> ThemeRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(themes::table.filter(themes::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(ThemeRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(ThemeRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ThemeId) -> ThemeRepositoryResult<Option<Theme>> {
        self.run_blocking(move |connection| {
            let row = themes::table
                .filter(themes::id.eq(id.into_inner()))
                .select(ThemeRow::as_select())
                .first::<ThemeRow>(connection)
                .optional()
                .map_err(ThemeRepositoryError::persistence)?;
            row.map(row_to_theme).transpose()
        })
        .await
    }

    async fn list(&self, limit: usize, offset: usize) -> ThemeRepositoryResult<Vec<Theme>> {
        let page_limit = sql_bound(limit);
        let page_offset = sql_bound(offset);
        self.run_blocking(move |connection| {
            let rows = themes::table
                .order((themes::name.asc(), themes::id.asc()))
                .limit(page_limit)
                .offset(page_offset)
                .select(ThemeRow::as_select())
                .load::<ThemeRow>(connection)
                .map_err(ThemeRepositoryError::persistence)?;
            rows.into_iter().map(row_to_theme).collect()
        })
        .await
    }
}

fn map_write_error(err: DieselError, name: &ThemeName) -> ThemeRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ThemeRepositoryError::DuplicateName(name.clone())
        }
        other => ThemeRepositoryError::persistence(other),
    }
}

fn to_record(theme: &Theme) -> ThemeRecord {
    ThemeRecord {
        id: theme.id().into_inner(),
        name: theme.name().as_str().to_owned(),
        description: theme.description().map(str::to_owned),
        created_at: theme.created_at(),
        updated_at: theme.updated_at(),
    }
}

fn row_to_theme(row: ThemeRow) -> ThemeRepositoryResult<Theme> {
    let ThemeRow {
        id,
        name,
        description,
        created_at,
        updated_at,
    } = row;

    Ok(Theme::from_persisted(PersistedThemeData {
        id: ThemeId::from_uuid(id),
        name: ThemeName::new(name).map_err(ThemeRepositoryError::persistence)?,
        description,
        created_at,
        updated_at,
    }))
}
