//! Bearer-token authentication extractor.

use super::{error::ApiError, state::AppState};
use crate::access::Actor;
use crate::identity::domain::User;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

/// The authenticated caller.
///
/// Extraction fails with 401 when the `Authorization` header is missing, is
/// not a bearer credential, or carries a token the account service rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// The caller as presented to the authorization gate.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::from(&self.0)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("not authenticated"))?;
        let user = state.accounts.authenticate(token).await?;
        Ok(Self(user))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let credential = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !credential.is_empty()).then_some(credential)
}
