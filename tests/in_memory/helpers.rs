//! Shared fixtures for in-memory end-to-end tests.

use chrono::Duration;
use rstest::fixture;
use tasktrack::access::Actor;
use tasktrack::app::in_memory_state;
use tasktrack::http::AppState;
use tasktrack::identity::{adapters::jwt::JwtTokenIssuer, services::RegisterRequest};

/// Signing key used by test token issuers.
pub const TEST_SECRET: &[u8] = b"test-secret-key-with-at-least-32-bytes";

/// Fresh in-memory application state.
#[fixture]
pub fn state() -> AppState {
    in_memory_state(JwtTokenIssuer::new(TEST_SECRET, Duration::minutes(30)))
}

/// Registers a regular user named `name` and returns it as an actor.
pub async fn register(state: &AppState, name: &str) -> Actor {
    let user = state
        .accounts
        .register(RegisterRequest::new(
            format!("{name}@example.com"),
            name,
            "password123",
        ))
        .await
        .unwrap_or_else(|err| panic!("register {name}: {err}"));
    Actor::from(&user)
}

/// Creates an administrator named `name` and returns it as an actor.
pub async fn admin(state: &AppState, name: &str) -> Actor {
    let (user, _) = state
        .accounts
        .ensure_admin(RegisterRequest::new(
            format!("{name}@example.com"),
            name,
            "password123",
        ))
        .await
        .unwrap_or_else(|err| panic!("admin {name}: {err}"));
    Actor::from(&user)
}
