//! In-memory user repository for tests and the `memory` storage mode.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{Email, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    email_index: HashMap<Email, UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.email_index.contains_key(user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let previous_email = state
            .users
            .get(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?
            .email()
            .clone();

        let collides = state
            .email_index
            .get(user.email())
            .is_some_and(|owner| *owner != user.id());
        if collides {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }

        state.email_index.remove(&previous_email);
        state.email_index.insert(user.email().clone(), user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}
