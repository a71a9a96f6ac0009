use uuid::Uuid;

use super::{dto::CreateFoodRequest, dto::FoodsResponse, repo_types::Food};
use crate::{error::AppError, store::NewFood};

/// Per-serving ceilings. Keeps day and lifetime sums far from `i64` overflow.
pub const MAX_CALORIES: i64 = 100_000;
pub const MAX_PROTEIN: i64 = 10_000;

/// Trims and validates a create request into a storable food.
pub fn validate_new_food(user_id: Uuid, req: CreateFoodRequest) -> Result<NewFood, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Food name is required".into()));
    }
    if req.calories <= 0 {
        return Err(AppError::Validation(
            "Calories must be a positive number".into(),
        ));
    }
    if req.calories > MAX_CALORIES {
        return Err(AppError::Validation(format!(
            "Calories must be at most {MAX_CALORIES}"
        )));
    }
    if req.protein < 0 {
        return Err(AppError::Validation("Protein must be 0 or greater".into()));
    }
    if req.protein > MAX_PROTEIN {
        return Err(AppError::Validation(format!(
            "Protein must be at most {MAX_PROTEIN}"
        )));
    }
    let emoji = req.emoji.trim();
    match emoji.chars().count() {
        0 => return Err(AppError::Validation("Emoji is required".into())),
        1 | 2 => {}
        _ => {
            return Err(AppError::Validation(
                "Emoji should be 1-2 characters".into(),
            ))
        }
    }

    Ok(NewFood {
        user_id,
        name: name.to_string(),
        icon: emoji.to_string(),
        calories: req.calories,
        protein: req.protein,
    })
}

/// Favorites first, each list sorted by name.
pub fn split_by_favorite(mut foods: Vec<Food>) -> FoodsResponse {
    foods.sort_by(|a, b| a.name.cmp(&b.name));
    let (favorite_foods, regular_foods) = foods.into_iter().partition(|f| f.favorite);
    FoodsResponse {
        favorite_foods,
        regular_foods,
    }
}
