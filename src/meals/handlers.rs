use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::CreateMealRequest, repo_types::MealRecord, services::build_meal};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", delete(delete_meal))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealRecord>), AppError> {
    let food = state
        .store
        .find_food(user_id, payload.food_id)
        .await?
        .ok_or(AppError::NotFound("Food not found"))?;

    let meal = build_meal(user_id, &food, &payload)?;
    let meal = state.store.insert_meal(meal).await?;
    info!(
        %user_id,
        meal_id = %meal.id,
        date = %meal.date.civil_date(),
        calories = meal.calories,
        "meal logged"
    );
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_meal(user_id, id).await? {
        info!(%user_id, meal_id = %id, "meal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        warn!(%user_id, meal_id = %id, "delete of unknown meal");
        Err(AppError::NotFound("Meal not found"))
    }
}
