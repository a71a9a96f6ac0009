use serde::{Deserialize, Serialize};

use super::repo_types::Food;

#[derive(Debug, Deserialize)]
pub struct CreateFoodRequest {
    pub name: String,
    pub calories: i64,
    pub protein: i64,
    pub emoji: String,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub favorite: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct FoodsResponse {
    pub favorite_foods: Vec<Food>,
    pub regular_foods: Vec<Food>,
}
