/*
 * Responsibility
 * - Config 読み込み → 依存生成 (DrinkRepo / Authorizer) → Router 組み立て
 * - Middleware の適用 (HTTP / security headers / CORS)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::{DrinkRepo, InMemoryDrinkRepo, RecipePart};
use crate::services::auth::build_authorizer;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,coffee_shop_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let drinks = Arc::new(InMemoryDrinkRepo::new());
    if config.seed_drinks {
        seed(drinks.as_ref()).await?;
    }

    let authorizer = build_authorizer(config)?;

    Ok(AppState::new(drinks, authorizer))
}

async fn seed(drinks: &dyn DrinkRepo) -> Result<()> {
    let row = drinks
        .create(
            "water",
            vec![RecipePart {
                color: "blue".to_string(),
                name: "water".to_string(),
                parts: 1,
            }],
        )
        .await?;
    tracing::info!(drink_id = row.id, "seeded sample drink");
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::router(state);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
