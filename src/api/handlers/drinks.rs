/*
 * Responsibility
 * - /drinks 系 handler
 * - 権限チェックは routes.rs の guard が済ませている (handler は VerifiedClaims を受け取るだけ)
 * - 不正な body / title 重複は 422, 存在しない id は 404
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::VerifiedClaims,
    },
    error::AppError,
    state::AppState,
};

fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        AppError::Unprocessable
    })
}

fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = state.drinks.list().await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn get_drinks_detail(
    VerifiedClaims(_claims): VerifiedClaims,
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    VerifiedClaims(claims): VerifiedClaims,
    State(state): State<AppState>,
    req: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let (title, recipe) = body(req)?
        .validate()
        .map_err(|_| AppError::Unprocessable)?;

    let row = state.drinks.create(&title, recipe).await?;
    tracing::info!(drink_id = row.id, subject = claims.subject().unwrap_or("-"), "drink created");

    Ok(Json(DrinksResponse::new(vec![row.into()])))
}

pub async fn update_drink(
    VerifiedClaims(claims): VerifiedClaims,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    req: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let id = drink_id(path)?;
    let (title, recipe) = body(req)?
        .validate()
        .map_err(|_| AppError::Unprocessable)?;

    let row = state
        .drinks
        .update(id, title.as_deref(), recipe)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(drink_id = id, subject = claims.subject().unwrap_or("-"), "drink updated");

    Ok(Json(DrinksResponse::new(vec![row.into()])))
}

pub async fn delete_drink(
    VerifiedClaims(claims): VerifiedClaims,
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = drink_id(path)?;

    if !state.drinks.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(drink_id = id, subject = claims.subject().unwrap_or("-"), "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
