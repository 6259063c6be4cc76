//! `Authorization: Bearer <token>` extraction.

use std::fmt;

use axum::http::{HeaderMap, header};

use crate::services::auth::failure::AuthFailure;

/// Bearer credential taken from a single request. Never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct RawToken(String);

impl RawToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawToken(<redacted>)")
    }
}

/// Pull the bearer token out of the request headers.
///
/// The header value must split on whitespace into exactly `<scheme> <token>`,
/// with `scheme` equal to `Bearer` ignoring ASCII case.
pub fn extract(headers: &HeaderMap) -> Result<RawToken, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedAuthHeader)?;

    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthFailure::MalformedAuthHeader);
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::MalformedAuthHeader);
    }

    Ok(RawToken::new(token))
}
