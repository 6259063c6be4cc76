use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::ClaimsPayload;

/// Verified claims of the caller, placed in request extensions by `middleware::auth::guard`.
///
/// Using this extractor on a route without the guard is a wiring bug and
/// answers 500.
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub ClaimsPayload);

impl<S> FromRequestParts<S> for VerifiedClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimsPayload>()
            .cloned()
            .map(VerifiedClaims)
            .ok_or_else(|| {
                tracing::error!(path = %parts.uri.path(), "VerifiedClaims used on an unguarded route");
                AppError::Internal
            })
    }
}
