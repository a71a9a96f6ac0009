use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateFoodRequest, FavoriteRequest, FoodsResponse},
    repo_types::Food,
    services::{split_by_favorite, validate_new_food},
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", get(get_food))
        .route("/foods/:id/favorite", put(set_favorite))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<FoodsResponse>, AppError> {
    let foods = state.store.list_foods(user_id).await?;
    Ok(Json(split_by_favorite(foods)))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateFoodRequest>,
) -> Result<(StatusCode, Json<Food>), AppError> {
    let new_food = validate_new_food(user_id, payload)?;
    let food = state.store.insert_food(new_food).await?;
    info!(%user_id, food_id = %food.id, name = %food.name, "food created");
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Food>, AppError> {
    state
        .store
        .find_food(user_id, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Food not found"))
}

#[instrument(skip(state))]
pub async fn set_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<FavoriteRequest>,
) -> Result<Json<Food>, AppError> {
    let food = state
        .store
        .set_food_favorite(user_id, id, body.favorite)
        .await?
        .ok_or(AppError::NotFound("Food not found"))?;
    info!(%user_id, food_id = %id, favorite = body.favorite, "food favorite updated");
    Ok(Json(food))
}
