use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{dates::CanonicalInstant, store::StoreError};

/// Meal-time slot. Declaration order is the display order within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealTime {
    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
            MealTime::Snack => "snack",
        }
    }
}

impl FromStr for MealTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealTime::Breakfast),
            "lunch" => Ok(MealTime::Lunch),
            "dinner" => Ok(MealTime::Dinner),
            "snack" => Ok(MealTime::Snack),
            other => Err(format!("unknown meal time {other:?}")),
        }
    }
}

/// Fraction of a food's base serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServingSize {
    #[serde(rename = "1/4")]
    Quarter,
    #[serde(rename = "1/3")]
    Third,
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "2/3")]
    TwoThirds,
    #[serde(rename = "3/4")]
    ThreeQuarters,
    #[serde(rename = "1")]
    Whole,
}

impl ServingSize {
    pub fn multiplier(self) -> f64 {
        match self {
            ServingSize::Quarter => 0.25,
            ServingSize::Third => 0.333,
            ServingSize::Half => 0.5,
            ServingSize::TwoThirds => 0.667,
            ServingSize::ThreeQuarters => 0.75,
            ServingSize::Whole => 1.0,
        }
    }

    /// Scales a base amount, rounding to the nearest integer.
    pub fn scale(self, base: i64) -> i64 {
        (base as f64 * self.multiplier()).round() as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServingSize::Quarter => "1/4",
            ServingSize::Third => "1/3",
            ServingSize::Half => "1/2",
            ServingSize::TwoThirds => "2/3",
            ServingSize::ThreeQuarters => "3/4",
            ServingSize::Whole => "1",
        }
    }
}

impl FromStr for ServingSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1/4" => Ok(ServingSize::Quarter),
            "1/3" => Ok(ServingSize::Third),
            "1/2" => Ok(ServingSize::Half),
            "2/3" => Ok(ServingSize::TwoThirds),
            "3/4" => Ok(ServingSize::ThreeQuarters),
            "1" => Ok(ServingSize::Whole),
            other => Err(format!("unknown serving size {other:?}")),
        }
    }
}

/// A logged meal. Calories and protein are already scaled by the serving size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub icon: String,
    pub calories: i64,
    pub protein: i64,
    pub serving_size: ServingSize,
    pub meal_time: MealTime,
    pub date: CanonicalInstant,
}

/// `meals` row as stored; enum columns are TEXT.
#[derive(Debug, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub icon: String,
    pub calories: i64,
    pub protein: i64,
    pub serving_size: String,
    pub meal_time: String,
    pub date: OffsetDateTime,
}

impl TryFrom<MealRow> for MealRecord {
    type Error = StoreError;

    fn try_from(r: MealRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            food_id: r.food_id,
            name: r.name,
            icon: r.icon,
            calories: r.calories,
            protein: r.protein,
            serving_size: r.serving_size.parse().map_err(StoreError::Corrupt)?,
            meal_time: r.meal_time.parse().map_err(StoreError::Corrupt)?,
            date: CanonicalInstant::from_stored(r.date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_rounds_to_nearest() {
        assert_eq!(ServingSize::Whole.scale(250), 250);
        assert_eq!(ServingSize::Half.scale(250), 125);
        assert_eq!(ServingSize::Quarter.scale(250), 63); // 62.5
        assert_eq!(ServingSize::Third.scale(300), 100); // 99.9
        assert_eq!(ServingSize::TwoThirds.scale(30), 20); // 20.01
        assert_eq!(ServingSize::ThreeQuarters.scale(0), 0);
    }

    #[test]
    fn serving_size_wire_names() {
        let s: ServingSize = serde_json::from_str("\"2/3\"").unwrap();
        assert_eq!(s, ServingSize::TwoThirds);
        assert_eq!(serde_json::to_string(&ServingSize::Whole).unwrap(), "\"1\"");
        for s in ["1/4", "1/3", "1/2", "2/3", "3/4", "1"] {
            assert_eq!(s.parse::<ServingSize>().unwrap().as_str(), s);
        }
        assert!("1/5".parse::<ServingSize>().is_err());
    }

    #[test]
    fn meal_time_orders_by_slot() {
        let mut slots = vec![MealTime::Snack, MealTime::Dinner, MealTime::Breakfast, MealTime::Lunch];
        slots.sort();
        assert_eq!(
            slots,
            vec![MealTime::Breakfast, MealTime::Lunch, MealTime::Dinner, MealTime::Snack]
        );
        assert_eq!("dinner".parse::<MealTime>().unwrap(), MealTime::Dinner);
        assert!("brunch".parse::<MealTime>().is_err());
    }

    #[test]
    fn corrupt_row_is_reported() {
        let row = MealRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_id: Uuid::new_v4(),
            name: "Toast".into(),
            icon: "🍞".into(),
            calories: 100,
            protein: 3,
            serving_size: "1".into(),
            meal_time: "elevenses".into(),
            date: OffsetDateTime::UNIX_EPOCH,
        };
        let err = MealRecord::try_from(row).unwrap_err();
        assert!(err.to_string().contains("elevenses"));
    }
}
