/*
 * Responsibility
 * - URL 構造を定義
 * - 保護する route ごとに必要な権限 (RequiredPermissions) をここで宣言する
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, get_drinks_detail, list_drinks, update_drink},
    health::health,
};
use crate::middleware::auth::guard;
use crate::state::AppState;

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

pub fn routes(state: &AppState) -> Router<AppState> {
    let auth = &state.authorizer;

    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(guard(post(create_drink), auth, [POST_DRINKS].into())),
        )
        .route(
            "/drinks-detail",
            guard(get(get_drinks_detail), auth, [GET_DRINKS_DETAIL].into()),
        )
        .route(
            "/drinks/{drink_id}",
            guard(patch(update_drink), auth, [PATCH_DRINKS].into())
                .merge(guard(delete(delete_drink), auth, [DELETE_DRINKS].into())),
        )
}
