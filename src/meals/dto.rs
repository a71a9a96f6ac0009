use serde::Deserialize;
use uuid::Uuid;

use super::repo_types::{MealTime, ServingSize};

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub food_id: Uuid,
    pub meal_time: MealTime,
    pub serving_size: ServingSize,
    /// `YYYY-MM-DD` in US Eastern.
    pub date: String,
}
