//! Read-only views. A failing store degrades to empty statistics instead of an error.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::{
    aggregate::{aggregate_day, build_history, build_trailing_window, profile_totals, sort_for_display},
    dto::{DailyStats, ProfileStats},
};
use crate::{
    auth::AuthUser,
    dates::{parse_civil_date, to_canonical_instant, today, CivilDate},
    error::AppError,
    state::AppState,
    store::InstantRange,
};

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/days/:date", get(get_day))
        .route("/today", get(get_today))
        .route("/history", get(get_history))
        .route("/trends", get(get_trends))
        .route("/profile/stats", get(get_profile_stats))
}

async fn day_stats(state: &AppState, user_id: Uuid, date: CivilDate) -> DailyStats {
    let store = &state.store;
    let fetched = tokio::try_join!(
        store.list_meals(user_id, Some(InstantRange::days(date, date))),
        store.find_habit(user_id, to_canonical_instant(date)),
    );
    match fetched {
        Ok((mut meals, habit)) => {
            sort_for_display(&mut meals);
            aggregate_day(date, meals, habit.as_ref())
        }
        Err(e) => {
            error!(error = %e, %user_id, %date, "day stats unavailable");
            DailyStats::empty(date)
        }
    }
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DailyStats>, AppError> {
    let date = parse_civil_date(&date)?;
    Ok(Json(day_stats(&state, user_id, date).await))
}

#[instrument(skip(state))]
pub async fn get_today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<DailyStats> {
    let date = today(state.clock.as_ref());
    Json(day_stats(&state, user_id, date).await)
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<DailyStats>> {
    let store = &state.store;
    match tokio::try_join!(store.list_meals(user_id, None), store.list_habits(user_id, None)) {
        Ok((meals, habits)) => Json(build_history(meals, &habits)),
        Err(e) => {
            error!(error = %e, %user_id, "history unavailable");
            Json(Vec::new())
        }
    }
}

#[instrument(skip(state))]
pub async fn get_trends(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<DailyStats>> {
    let window = state.config.trend_window_days;
    let anchor = today(state.clock.as_ref());
    let range = window
        .checked_sub(1)
        .and_then(|back| anchor.days_before(back))
        .map(|first| InstantRange::days(first, anchor));

    let store = &state.store;
    match tokio::try_join!(store.list_meals(user_id, range), store.list_habits(user_id, range)) {
        Ok((meals, habits)) => Json(build_trailing_window(meals, &habits, window, anchor)),
        Err(e) => {
            error!(error = %e, %user_id, "trends unavailable");
            Json(build_trailing_window(Vec::new(), &[], window, anchor))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_profile_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<ProfileStats> {
    let store = &state.store;
    match tokio::try_join!(
        store.count_meals(user_id),
        store.count_foods(user_id),
        store.list_habits(user_id, None),
    ) {
        Ok((meals, foods, habits)) => Json(profile_totals(meals, foods, &habits)),
        Err(e) => {
            error!(error = %e, %user_id, "profile stats unavailable");
            Json(ProfileStats::default())
        }
    }
}
