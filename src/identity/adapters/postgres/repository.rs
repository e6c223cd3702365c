//! `PostgreSQL` repository implementation for user storage.

use super::{
    models::{UserRecord, UserRow},
    schema::users,
};
use crate::identity::{
    domain::{Email, PasswordHash, PersistedUserData, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::persistence::{PgPool, get_conn_with, run_blocking_with};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking_with(
            move || {
                let mut connection = get_conn_with(&pool, UserRepositoryError::persistence)?;
                f(&mut connection)
            },
            UserRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let email = user.email().clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let email = user.email().clone();
        let id = user.id();
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(id.into_inner())))
                .set(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &email))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &Email) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

fn map_write_error(err: DieselError, email: &Email) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::DuplicateEmail(email.clone())
        }
        other => UserRepositoryError::persistence(other),
    }
}

fn to_record(user: &User) -> UserRecord {
    UserRecord {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        username: user.username().as_str().to_owned(),
        hashed_password: user.password_hash().as_str().to_owned(),
        is_admin: user.is_admin(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        email,
        username,
        hashed_password,
        is_admin,
        created_at,
        updated_at,
    } = row;

    let data = PersistedUserData {
        id: UserId::from_uuid(id),
        email: Email::new(email).map_err(UserRepositoryError::persistence)?,
        username: Username::new(username).map_err(UserRepositoryError::persistence)?,
        password_hash: PasswordHash::from_phc(hashed_password),
        is_admin,
        created_at,
        updated_at,
    };
    Ok(User::from_persisted(data))
}
