use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::UpdateHabitsRequest,
    repo_types::{HabitRecord, MAX_FRUITS},
};
use crate::{
    auth::AuthUser,
    dates::{parse_civil_date, to_canonical_instant},
    error::AppError,
    state::AppState,
};

pub fn habit_routes() -> Router<AppState> {
    Router::new().route("/habits/:date", get(get_habits).put(update_habits))
}

#[instrument(skip(state))]
pub async fn get_habits(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<Option<HabitRecord>>, AppError> {
    let date = to_canonical_instant(parse_civil_date(&date)?);
    Ok(Json(state.store.find_habit(user_id, date).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_habits(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
    Json(payload): Json<UpdateHabitsRequest>,
) -> Result<Json<HabitRecord>, AppError> {
    let civil = parse_civil_date(&date)?;
    let fruits_count = u8::try_from(payload.fruits_count)
        .ok()
        .filter(|n| *n <= MAX_FRUITS)
        .ok_or_else(|| AppError::Validation("Fruits count must be between 0 and 2".into()))?;

    let habit = state
        .store
        .upsert_habit(HabitRecord {
            user_id,
            date: to_canonical_instant(civil),
            workout_done: payload.workout_done,
            fruits_count,
        })
        .await?;
    info!(%user_id, date = %civil, workout_done = habit.workout_done, fruits_count, "habits updated");
    Ok(Json(habit))
}
