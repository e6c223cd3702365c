//! Route table.
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | POST | `/auth/register`, `/auth/login` | none |
//! | GET | `/auth/me`, `/users/me` | bearer |
//! | PATCH | `/users/me` | bearer |
//! | GET | `/themes`, `/themes/{id}` | none |
//! | POST, PATCH, DELETE | `/themes`, `/themes/{id}` | bearer, admin |
//! | GET | `/tasks`, `/tasks/{id}` | none |
//! | POST, PATCH, DELETE | `/tasks`, `/tasks/{id}` | bearer, creator or admin |
//! | POST | `/tasks/{id}/status` | bearer, creator or admin |
//! | GET | `/tasks/{id}/history` | bearer, creator, assignee or admin |
//! | GET | `/analytics/summary`, `/health` | none |

use super::handlers::{self, analytics, auth, tasks, themes, users};
use super::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Builds the application router over `state`.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/users/me", get(auth::me).patch(users::update_me))
        .route("/themes", get(themes::list).post(themes::create))
        .route(
            "/themes/{id}",
            get(themes::get).patch(themes::update).delete(themes::delete),
        )
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/{id}",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .route("/tasks/{id}/status", post(tasks::change_status))
        .route("/tasks/{id}/history", get(tasks::history))
        .route("/analytics/summary", get(analytics::summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
