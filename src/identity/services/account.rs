//! Registration, login, token authentication and profile updates.

use crate::error::ErrorKind;
use crate::identity::{
    domain::{Email, IdentityDomainError, PlainPassword, User, UserId, Username},
    ports::{
        AccessToken, CredentialError, PasswordHasher, TokenError, TokenIssuer, UserRepository,
        UserRepositoryError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    email: String,
    username: String,
    password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Partial profile update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl UpdateProfileRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new login email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets a new display name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets a new password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// The email address already belongs to another account.
    #[error("email already registered: {0}")]
    EmailTaken(Email),

    /// Login failed; unknown email and wrong password are indistinguishable.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The bearer token was rejected or names no existing user.
    #[error("could not validate credentials: {0}")]
    Unauthorized(String),

    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The hashing backend failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The token could not be issued.
    #[error(transparent)]
    Token(TokenError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl From<UserRepositoryError> for AccountError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail(email) => Self::EmailTaken(email),
            UserRepositoryError::NotFound(id) => Self::NotFound(id),
            other @ UserRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

impl AccountError {
    /// Classifies the error for the service boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::EmailTaken(_) => ErrorKind::InvalidArgument,
            Self::InvalidCredentials | Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Credential(_) | Self::Token(_) | Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account orchestration service.
pub struct AccountService<U, H, T, C>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenIssuer + ?Sized,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<C>,
}

impl<U, H, T, C> Clone for AccountService<U, H, T, C>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenIssuer + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            tokens: Arc::clone(&self.tokens),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, H, T, C> AccountService<U, H, T, C>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenIssuer + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    /// Registers a regular user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for malformed input and
    /// [`AccountError::EmailTaken`] when the email is already registered.
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<User> {
        let email = Email::new(request.email)?;
        let username = Username::new(request.username)?;
        let password = PlainPassword::new(request.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email));
        }

        let hash = self.hasher.hash(&password)?;
        let user = User::register(email, username, hash, &*self.clock);
        self.users.store(&user).await?;
        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }

    /// Creates an admin account unless one with the same email exists.
    ///
    /// Returns the existing or newly created user and whether it was created.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError`] on invalid input or persistence failure.
    pub async fn ensure_admin(&self, request: RegisterRequest) -> AccountResult<(User, bool)> {
        let email = Email::new(request.email)?;
        if let Some(existing) = self.users.find_by_email(&email).await? {
            return Ok((existing, false));
        }

        let username = Username::new(request.username)?;
        let password = PlainPassword::new(request.password)?;
        let hash = self.hasher.hash(&password)?;
        let user = User::register_admin(email, username, hash, &*self.clock);
        self.users.store(&user).await?;
        info!(user_id = %user.id(), "created admin user");
        Ok((user, true))
    }

    /// Checks an email/password pair and issues an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    pub async fn login(&self, email: &str, password: &str) -> AccountResult<AccessToken> {
        let Ok(email) = Email::new(email) else {
            return Err(AccountError::InvalidCredentials);
        };
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login attempt for unknown email");
            return Err(AccountError::InvalidCredentials);
        };
        if !self.hasher.verify(password, user.password_hash())? {
            warn!(user_id = %user.id(), "login attempt with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        self.tokens
            .issue(user.id(), self.clock.utc())
            .map_err(AccountError::Token)
    }

    /// Resolves a bearer token to the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Unauthorized`] when the token is invalid,
    /// expired or names a user that no longer exists.
    pub async fn authenticate(&self, token: &str) -> AccountResult<User> {
        let user_id = self
            .tokens
            .verify(token)
            .map_err(|err| AccountError::Unauthorized(err.to_string()))?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountError::Unauthorized("user not found".to_owned()))
    }

    /// Fetches a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] when the user does not exist.
    pub async fn profile(&self, user_id: UserId) -> AccountResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AccountError::NotFound(user_id))
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for malformed fields,
    /// [`AccountError::EmailTaken`] when the new email belongs to someone
    /// else and [`AccountError::NotFound`] for an unknown user.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        request: UpdateProfileRequest,
    ) -> AccountResult<User> {
        let email = request.email.map(Email::new).transpose()?;
        let username = request.username.map(Username::new).transpose()?;
        let password = request.password.map(PlainPassword::new).transpose()?;

        let mut user = self.profile(user_id).await?;

        if let Some(new_email) = email {
            let owner = self.users.find_by_email(&new_email).await?;
            if owner.is_some_and(|other| other.id() != user_id) {
                return Err(AccountError::EmailTaken(new_email));
            }
            user.change_email(new_email, &*self.clock);
        }
        if let Some(new_username) = username {
            user.rename(new_username, &*self.clock);
        }
        if let Some(new_password) = password {
            let hash = self.hasher.hash(&new_password)?;
            user.change_password(hash, &*self.clock);
        }

        self.users.update(&user).await?;
        info!(user_id = %user_id, "updated profile");
        Ok(user)
    }
}
