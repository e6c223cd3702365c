//! HS256 JWT implementation of the [`TokenIssuer`] port.
//!
//! Tokens carry the user identifier in `sub` plus `iat`/`exp` claims. The
//! lifetime comes from configuration.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{
    domain::UserId,
    ports::{AccessToken, TokenError, TokenIssuer},
};

/// Claims stored in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtTokenIssuer {
    /// Creates an issuer from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
        }
    }
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: UserId, issued_at: DateTime<Utc>) -> Result<AccessToken, TokenError> {
        let expires_at = issued_at + self.lifetime;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map(AccessToken::bearer)
            .map_err(|err| TokenError::Encoding(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err.to_string()),
            },
        )?;
        let subject = Uuid::parse_str(&data.claims.sub)
            .map_err(|err| TokenError::Invalid(format!("subject is not a user id: {err}")))?;
        Ok(UserId::from_uuid(subject))
    }
}
