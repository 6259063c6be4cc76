/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - drinks: DrinkRepo, authorizer: Authorizer
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::DrinkRepo;
use crate::services::auth::Authorizer;

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepo>,
    pub authorizer: Authorizer,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepo>, authorizer: Authorizer) -> Self {
        Self { drinks, authorizer }
    }
}
