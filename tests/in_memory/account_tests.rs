//! Registration, login and admin bootstrap.

use super::helpers::{register, state};
use eyre::{bail, ensure};
use rstest::rstest;
use tasktrack::error::ErrorKind;
use tasktrack::http::AppState;
use tasktrack::identity::services::{RegisterRequest, UpdateProfileRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_issues_token_for_registered_user(state: AppState) -> eyre::Result<()> {
    let actor = register(&state, "alice").await;

    let token = state.accounts.login("Alice@Example.com", "password123").await?;
    ensure!(token.token_type == "bearer", "unexpected token type");

    let user = state.accounts.authenticate(&token.access_token).await?;
    ensure!(user.id() == actor.id(), "token resolved to another user");
    ensure!(!user.is_admin(), "registered users are not admins");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_and_unknown_email_look_alike(state: AppState) -> eyre::Result<()> {
    register(&state, "alice").await;

    let wrong = state.accounts.login("alice@example.com", "nope-nope").await;
    let unknown = state.accounts.login("bob@example.com", "password123").await;
    let (Err(wrong), Err(unknown)) = (wrong, unknown) else {
        bail!("login should fail for bad credentials");
    };
    ensure!(wrong.kind() == ErrorKind::Unauthorized, "got {wrong}");
    ensure!(wrong.to_string() == unknown.to_string(), "messages differ");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_invalid_argument(state: AppState) -> eyre::Result<()> {
    register(&state, "alice").await;
    let again = state
        .accounts
        .register(RegisterRequest::new("ALICE@example.com", "other", "password123"))
        .await;
    let Err(err) = again else {
        bail!("duplicate registration accepted");
    };
    ensure!(err.kind() == ErrorKind::InvalidArgument, "got {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn garbage_token_is_unauthorized(state: AppState) -> eyre::Result<()> {
    let Err(err) = state.accounts.authenticate("not-a-token").await else {
        bail!("garbage token accepted");
    };
    ensure!(err.kind() == ErrorKind::Unauthorized, "got {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_email_stays_unique(state: AppState) -> eyre::Result<()> {
    register(&state, "alice").await;
    let bob = register(&state, "bob").await;

    let taken = state
        .accounts
        .update_profile(
            bob.id(),
            UpdateProfileRequest::new().with_email("alice@example.com"),
        )
        .await;
    let Err(err) = taken else {
        bail!("email collision accepted");
    };
    ensure!(err.kind() == ErrorKind::InvalidArgument, "got {err}");

    let renamed = state
        .accounts
        .update_profile(bob.id(), UpdateProfileRequest::new().with_username("Robert"))
        .await?;
    ensure!(renamed.username().as_str() == "Robert", "username not updated");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ensure_admin_is_idempotent(state: AppState) -> eyre::Result<()> {
    let request = RegisterRequest::new("root@example.com", "root", "password123");
    let (first, created) = state.accounts.ensure_admin(request.clone()).await?;
    ensure!(created && first.is_admin(), "admin not created");

    let (second, created_again) = state.accounts.ensure_admin(request).await?;
    ensure!(!created_again, "admin created twice");
    ensure!(second.id() == first.id(), "different admin returned");
    Ok(())
}
