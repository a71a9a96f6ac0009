use serde::Serialize;

use crate::{dates::CivilDate, meals::repo_types::MealRecord};

/// One day's rollup. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: CivilDate,
    pub total_calories: i64,
    pub total_protein: i64,
    pub meals: Vec<MealRecord>,
    pub workout_done: bool,
    pub fruits_count: u8,
}

impl DailyStats {
    pub fn empty(date: CivilDate) -> Self {
        Self {
            date,
            total_calories: 0,
            total_protein: 0,
            meals: Vec::new(),
            workout_done: false,
            fruits_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub meals_eaten: i64,
    pub foods_saved: i64,
    pub workouts_logged: i64,
    pub fruits_eaten: i64,
}
