//! Per-route access guard: bearer token → JWKS verification → permission check.
//!
//! On success the verified `ClaimsPayload` is put into request extensions,
//! where the `VerifiedClaims` extractor picks it up. On failure the handler
//! is never called and the failure is rendered through `AppError`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::{Authorizer, RequiredPermissions};
use crate::state::AppState;

#[derive(Clone)]
struct GuardState {
    authorizer: Authorizer,
    required: Arc<RequiredPermissions>,
}

/// Wrap `route` so it only runs for callers holding every permission in `required`.
///
/// ```ignore
/// .route(
///     "/drinks-detail",
///     guard(get(get_drinks_detail), &state.authorizer, ["get:drinks-detail"].into()),
/// )
/// ```
pub fn guard(
    route: MethodRouter<AppState>,
    authorizer: &Authorizer,
    required: RequiredPermissions,
) -> MethodRouter<AppState> {
    let state = GuardState {
        authorizer: authorizer.clone(),
        required: Arc::new(required),
    };

    route.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(guard): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = match guard.authorizer.authorize(req.headers(), &guard.required).await {
        Ok(claims) => claims,
        Err(failure) => {
            tracing::warn!(
                code = failure.code(),
                required = %guard.required,
                method = %req.method(),
                path = %req.uri().path(),
                error = ?failure,
                "access denied"
            );
            return Err(failure.into());
        }
    };

    tracing::debug!(
        subject = claims.subject().unwrap_or("-"),
        required = %guard.required,
        "access granted"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
