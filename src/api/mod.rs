/*
 * Responsibility
 * - HTTP 境界 (routes / handlers / dto / extractors)
 * - router(): routes + fallback + state を束ねた Router を返す
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub use routes::{DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS, routes};

/// Routes with the JSON 404 fallback and state applied. HTTP-level layers are added in `app`.
pub fn router(state: AppState) -> Router {
    routes(&state)
        .fallback(|| async { AppError::NotFound })
        .with_state(state)
}
