//! Shared application state handed to every handler.

use crate::analytics::services::AnalyticsService;
use crate::identity::{
    ports::{PasswordHasher, TokenIssuer, UserRepository},
    services::AccountService,
};
use crate::task::{
    ports::{TaskReferences, TaskRepository},
    services::TaskService,
};
use crate::theme::{
    ports::{ThemeReferences, ThemeRepository},
    services::ThemeCatalogService,
};
use mockable::DefaultClock;

/// Account service over type-erased adapters.
pub type AccountServiceHandle =
    AccountService<dyn UserRepository, dyn PasswordHasher, dyn TokenIssuer, DefaultClock>;

/// Theme catalogue over type-erased adapters.
pub type ThemeServiceHandle =
    ThemeCatalogService<dyn ThemeRepository, dyn ThemeReferences, DefaultClock>;

/// Task service over type-erased adapters.
pub type TaskServiceHandle = TaskService<dyn TaskRepository, dyn TaskReferences, DefaultClock>;

/// Analytics service over a type-erased task repository.
pub type AnalyticsHandle = AnalyticsService<dyn TaskRepository, DefaultClock>;

/// Services reachable from the router.
///
/// The storage mode is chosen at startup, so adapters are erased behind
/// their port traits and one router serves both modes.
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and profile operations.
    pub accounts: AccountServiceHandle,
    /// Theme catalogue.
    pub themes: ThemeServiceHandle,
    /// Task CRUD and the status transition engine.
    pub tasks: TaskServiceHandle,
    /// Read-only aggregation.
    pub analytics: AnalyticsHandle,
}
