use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateHabitsRequest {
    pub workout_done: bool,
    pub fruits_count: i64,
}
