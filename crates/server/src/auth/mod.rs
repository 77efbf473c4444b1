//! Shared-secret bearer authentication.
//!
//! Every protected route is guarded by a single process-wide secret. There is
//! no per-caller identity: a request either carries the secret or it does not.

pub mod middleware;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use subtle::ConstantTimeEq;
use thiserror::Error;

pub use self::middleware::{AuthLayer, AuthMiddleware};

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header, or it does not use the `Bearer` scheme.
    #[error("missing bearer token")]
    MissingToken,

    /// A bearer token was supplied but it does not match the secret.
    #[error("invalid bearer token")]
    InvalidToken,
}

/// The configured API key. Never printed.
#[derive(Clone)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().into_bytes())
    }

    /// Constant-time comparison against a presented token.
    pub fn verify(&self, token: &str) -> bool {
        !token.is_empty() && bool::from(self.0.as_slice().ct_eq(token.as_bytes()))
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Pull the bearer token out of the `Authorization` header.
///
/// The token is the text after `"Bearer "` up to the next space; trailing
/// material after a second space is ignored.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let rest = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MissingToken)?;
    Ok(rest.split(' ').next().unwrap_or_default())
}

/// Check the request headers against the shared secret.
pub fn authenticate(headers: &HeaderMap, secret: &SharedSecret) -> Result<(), AuthError> {
    let token = extract_bearer(headers)?;
    if secret.verify(token) {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}
