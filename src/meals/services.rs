use uuid::Uuid;

use super::{dto::CreateMealRequest, repo_types::MealRecord};
use crate::{
    dates::{parse_civil_date, to_canonical_instant},
    error::AppError,
    foods::repo_types::Food,
};

/// Builds the meal for `req` from its food, scaling amounts by the serving size.
pub fn build_meal(user_id: Uuid, food: &Food, req: &CreateMealRequest) -> Result<MealRecord, AppError> {
    let date = parse_civil_date(&req.date)?;
    Ok(MealRecord {
        id: Uuid::new_v4(),
        user_id,
        food_id: food.id,
        name: food.name.clone(),
        icon: food.icon.clone(),
        calories: req.serving_size.scale(food.calories),
        protein: req.serving_size.scale(food.protein),
        serving_size: req.serving_size,
        meal_time: req.meal_time,
        date: to_canonical_instant(date),
    })
}
