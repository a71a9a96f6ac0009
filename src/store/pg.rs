use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{InstantRange, NewFood, Store, StoreError};
use crate::{
    dates::CanonicalInstant,
    foods::repo_types::Food,
    habits::repo_types::{HabitRecord, HabitRow},
    meals::repo_types::{MealRecord, MealRow},
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

fn conflict_on_unique(e: sqlx::Error, message: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Conflict(message.to_string());
        }
    }
    StoreError::Database(e)
}

const MEAL_COLUMNS: &str =
    "id, user_id, food_id, name, icon, calories, protein, serving_size, meal_time, date";

#[async_trait]
impl Store for PgStore {
    async fn insert_food(&self, food: NewFood) -> Result<Food, StoreError> {
        sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods (id, user_id, name, icon, calories, protein, favorite)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id, user_id, name, icon, calories, protein, favorite
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(food.user_id)
        .bind(&food.name)
        .bind(&food.icon)
        .bind(food.calories)
        .bind(food.protein)
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A food with this name already exists"))
    }

    async fn find_food(&self, user_id: Uuid, food_id: Uuid) -> Result<Option<Food>, StoreError> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, user_id, name, icon, calories, protein, favorite
            FROM foods
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(food_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(food)
    }

    async fn list_foods(&self, user_id: Uuid) -> Result<Vec<Food>, StoreError> {
        let foods = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, user_id, name, icon, calories, protein, favorite
            FROM foods
            WHERE user_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(foods)
    }

    async fn set_food_favorite(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        favorite: bool,
    ) -> Result<Option<Food>, StoreError> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            UPDATE foods SET favorite = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, icon, calories, protein, favorite
            "#,
        )
        .bind(food_id)
        .bind(user_id)
        .bind(favorite)
        .fetch_optional(&self.db)
        .await?;
        Ok(food)
    }

    async fn count_foods(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM foods WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }

    async fn insert_meal(&self, meal: MealRecord) -> Result<MealRecord, StoreError> {
        let row = sqlx::query_as::<_, MealRow>(&format!(
            r#"
            INSERT INTO meals ({MEAL_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(meal.food_id)
        .bind(&meal.name)
        .bind(&meal.icon)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.serving_size.as_str())
        .bind(meal.meal_time.as_str())
        .bind(meal.date.as_offset_date_time())
        .fetch_one(&self.db)
        .await?;
        row.try_into()
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_meals(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<MealRecord>, StoreError> {
        let rows = match range {
            Some(r) => {
                sqlx::query_as::<_, MealRow>(&format!(
                    r#"
                    SELECT {MEAL_COLUMNS}
                    FROM meals
                    WHERE user_id = $1 AND date >= $2 AND ($3::timestamptz IS NULL OR date < $3)
                    "#
                ))
                .bind(user_id)
                .bind(r.start.as_offset_date_time())
                .bind(r.end_bound())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, MealRow>(&format!(
                    "SELECT {MEAL_COLUMNS} FROM meals WHERE user_id = $1"
                ))
                .bind(user_id)
                .fetch_all(&self.db)
                .await?
            }
        };
        rows.into_iter().map(MealRecord::try_from).collect()
    }

    async fn count_meals(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }

    async fn upsert_habit(&self, habit: HabitRecord) -> Result<HabitRecord, StoreError> {
        let row = sqlx::query_as::<_, HabitRow>(
            r#"
            INSERT INTO habits (user_id, date, workout_done, fruits_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, date) DO UPDATE SET
                workout_done = EXCLUDED.workout_done,
                fruits_count = EXCLUDED.fruits_count
            RETURNING user_id, date, workout_done, fruits_count
            "#,
        )
        .bind(habit.user_id)
        .bind(habit.date.as_offset_date_time())
        .bind(habit.workout_done)
        .bind(i16::from(habit.fruits_count))
        .fetch_one(&self.db)
        .await?;
        row.try_into()
    }

    async fn find_habit(
        &self,
        user_id: Uuid,
        date: CanonicalInstant,
    ) -> Result<Option<HabitRecord>, StoreError> {
        let row = sqlx::query_as::<_, HabitRow>(
            r#"
            SELECT user_id, date, workout_done, fruits_count
            FROM habits
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date.as_offset_date_time())
        .fetch_optional(&self.db)
        .await?;
        row.map(HabitRecord::try_from).transpose()
    }

    async fn list_habits(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        let rows = match range {
            Some(r) => {
                sqlx::query_as::<_, HabitRow>(
                    r#"
                    SELECT user_id, date, workout_done, fruits_count
                    FROM habits
                    WHERE user_id = $1 AND date >= $2 AND ($3::timestamptz IS NULL OR date < $3)
                    "#,
                )
                .bind(user_id)
                .bind(r.start.as_offset_date_time())
                .bind(r.end_bound())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, HabitRow>(
                    "SELECT user_id, date, workout_done, fruits_count FROM habits WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_all(&self.db)
                .await?
            }
        };
        rows.into_iter().map(HabitRecord::try_from).collect()
    }
}
