//! Stateless session tokens.
//!
//! Sessions are HS256-signed JWTs carried in an HTTP-only cookie. The token
//! holds only the user id and an expiry; every request re-loads the user from
//! the database, so role or profile changes take effect immediately.

use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mandi_core::UserId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "mandi_session";

/// Session lifetime: 30 days.
const SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Errors from minting or verifying session tokens.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Token is missing, malformed, expired, or carries a bad signature.
    #[error("invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims for a session.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id the session belongs to.
    sub: i32,
    /// Expiry as a unix timestamp.
    exp: i64,
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Create a signer from the configured session secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Mint a session token for `user_id`, valid for 30 days.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn mint(&self, user_id: UserId) -> Result<String, SessionError> {
        let claims = Claims {
            sub: user_id.into(),
            exp: chrono::Utc::now().timestamp() + SESSION_TTL_SECONDS,
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token and return the user id it was minted for.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is wrong or the token has expired.
    pub fn verify(&self, token: &str) -> Result<UserId, SessionError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(UserId::from(data.claims.sub))
    }
}

/// Build the session cookie carrying `token`.
///
/// Cross-site frontends need `SameSite=None; Secure`; plain HTTP deployments
/// fall back to `Strict` since browsers reject `None` without `Secure`.
#[must_use]
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let same_site = if secure { SameSite::None } else { SameSite::Strict };
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS))
        .build()
}

/// Build an expired cookie that clears the session on the client.
#[must_use]
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let same_site = if secure { SameSite::None } else { SameSite::Strict };
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(same_site)
        .max_age(time::Duration::ZERO)
        .build()
}
