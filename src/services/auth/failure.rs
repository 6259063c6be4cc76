//! Failure taxonomy of the access pipeline.
//!
//! Every variant maps to exactly one HTTP status and one fixed message.
//! `Display` is the public message; anything more detailed (transport
//! errors, jsonwebtoken errors) only travels as `source()` and in logs.

use axum::http::StatusCode;
use thiserror::Error;

use crate::services::auth::jwks::KeySetError;

/// Why a token could not be accepted as a well-formed signed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDefect {
    /// Not compact JWS, or a segment is not base64url JSON.
    Unparseable,
    /// Structurally fine, but the signature does not match the key.
    BadSignature,
}

impl TokenDefect {
    fn message(self) -> &'static str {
        match self {
            Self::Unparseable => "unable to parse authentication token",
            Self::BadSignature => "token signature is invalid",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("authorization header is expected")]
    MissingAuthHeader,

    #[error("authorization header must be a bearer token")]
    MalformedAuthHeader,

    #[error("invalid token header")]
    InvalidHeader,

    #[error("unable to find the appropriate key")]
    KeyNotFound,

    #[error("token expired")]
    TokenExpired,

    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("{}", .0.message())]
    MalformedToken(TokenDefect),

    #[error("permissions not included in token")]
    MissingPermissionsClaim,

    #[error("permission not found")]
    Forbidden,

    #[error("unable to authenticate")]
    KeySetUnavailable(#[source] KeySetError),
}

impl AuthFailure {
    /// Machine-readable code, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "MissingAuthHeader",
            Self::MalformedAuthHeader => "MalformedAuthHeader",
            Self::InvalidHeader => "InvalidHeader",
            Self::KeyNotFound => "KeyNotFound",
            Self::TokenExpired => "TokenExpired",
            Self::InvalidClaims => "InvalidClaims",
            Self::MalformedToken(_) => "MalformedToken",
            Self::MissingPermissionsClaim => "MissingPermissionsClaim",
            Self::Forbidden => "Forbidden",
            Self::KeySetUnavailable(_) => "KeySetUnavailable",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedToken(TokenDefect::Unparseable) | Self::MissingPermissionsClaim => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
