//! JSON-over-HTTP surface built on axum.
//!
//! Handlers are thin: they decode the request, resolve the bearer token to
//! an [`Actor`](crate::access::Actor), call one service operation and map
//! the result. Every failure leaves as an [`ApiError`] carrying a
//! `{code, message}` body.

mod auth;
mod dto;
mod error;
mod extract;
mod handlers;
mod routes;
mod state;

pub use auth::CurrentUser;
pub use error::{ApiError, ErrorBody};
pub use routes::router;
pub use state::{AccountServiceHandle, AnalyticsHandle, AppState, TaskServiceHandle, ThemeServiceHandle};
