//! Persistence boundary. Every operation is scoped to one user.

mod memory;
mod pg;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dates::{to_canonical_instant, CanonicalInstant, CivilDate},
    foods::repo_types::Food,
    habits::repo_types::HabitRecord,
    meals::repo_types::MealRecord,
};

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Half-open `[start, end)` range of canonical instants. `end: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantRange {
    pub start: CanonicalInstant,
    pub end: Option<CanonicalInstant>,
}

impl InstantRange {
    /// Covers the whole days `first..=last`, i.e. `[first, last + 1 day)`.
    /// Open at the top when `last` is the final representable day.
    pub fn days(first: CivilDate, last: CivilDate) -> Self {
        Self {
            start: to_canonical_instant(first),
            end: last.next_day().map(to_canonical_instant),
        }
    }

    pub fn contains(&self, t: CanonicalInstant) -> bool {
        self.start <= t && self.end.map_or(true, |end| t < end)
    }

    pub(crate) fn end_bound(&self) -> Option<time::OffsetDateTime> {
        self.end.map(CanonicalInstant::as_offset_date_time)
    }
}

#[derive(Debug, Clone)]
pub struct NewFood {
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub calories: i64,
    pub protein: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the user already has a food with that name.
    async fn insert_food(&self, food: NewFood) -> Result<Food, StoreError>;
    async fn find_food(&self, user_id: Uuid, food_id: Uuid) -> Result<Option<Food>, StoreError>;
    async fn list_foods(&self, user_id: Uuid) -> Result<Vec<Food>, StoreError>;
    async fn set_food_favorite(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        favorite: bool,
    ) -> Result<Option<Food>, StoreError>;
    async fn count_foods(&self, user_id: Uuid) -> Result<i64, StoreError>;

    async fn insert_meal(&self, meal: MealRecord) -> Result<MealRecord, StoreError>;
    /// Returns whether a meal owned by `user_id` was removed.
    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError>;
    /// All meals of the user, or only those dated inside `range`. Unordered.
    async fn list_meals(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<MealRecord>, StoreError>;
    async fn count_meals(&self, user_id: Uuid) -> Result<i64, StoreError>;

    /// Creates or overwrites the record at `(habit.user_id, habit.date)`.
    async fn upsert_habit(&self, habit: HabitRecord) -> Result<HabitRecord, StoreError>;
    async fn find_habit(
        &self,
        user_id: Uuid,
        date: CanonicalInstant,
    ) -> Result<Option<HabitRecord>, StoreError>;
    async fn list_habits(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<HabitRecord>, StoreError>;
}
