use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{dates::CanonicalInstant, store::StoreError};

pub const MAX_FRUITS: u8 = 2;

/// One user's habits for one date. Unique per `(user_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRecord {
    pub user_id: Uuid,
    pub date: CanonicalInstant,
    pub workout_done: bool,
    pub fruits_count: u8,
}

#[derive(Debug, FromRow)]
pub struct HabitRow {
    pub user_id: Uuid,
    pub date: OffsetDateTime,
    pub workout_done: bool,
    pub fruits_count: i16,
}

impl TryFrom<HabitRow> for HabitRecord {
    type Error = StoreError;

    fn try_from(r: HabitRow) -> Result<Self, Self::Error> {
        let fruits_count = u8::try_from(r.fruits_count)
            .ok()
            .filter(|n| *n <= MAX_FRUITS)
            .ok_or_else(|| StoreError::Corrupt(format!("fruits_count {}", r.fruits_count)))?;
        Ok(Self {
            user_id: r.user_id,
            date: CanonicalInstant::from_stored(r.date),
            workout_done: r.workout_done,
            fruits_count,
        })
    }
}
