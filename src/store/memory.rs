use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InstantRange, NewFood, Store, StoreError};
use crate::{
    dates::CanonicalInstant, foods::repo_types::Food, habits::repo_types::HabitRecord,
    meals::repo_types::MealRecord,
};

/// Process-local store. Used by tests and when no `DATABASE_URL` is set.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    foods: HashMap<Uuid, Food>,
    meals: HashMap<Uuid, MealRecord>,
    habits: HashMap<(Uuid, CanonicalInstant), HabitRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_range(range: Option<InstantRange>, t: CanonicalInstant) -> bool {
    range.map_or(true, |r| r.contains(t))
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_food(&self, food: NewFood) -> Result<Food, StoreError> {
        let mut t = self.inner.write().await;
        let taken = t
            .foods
            .values()
            .any(|f| f.user_id == food.user_id && f.name == food.name);
        if taken {
            return Err(StoreError::Conflict(
                "A food with this name already exists".into(),
            ));
        }
        let row = Food {
            id: Uuid::new_v4(),
            user_id: food.user_id,
            name: food.name,
            icon: food.icon,
            calories: food.calories,
            protein: food.protein,
            favorite: false,
        };
        t.foods.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_food(&self, user_id: Uuid, food_id: Uuid) -> Result<Option<Food>, StoreError> {
        let t = self.inner.read().await;
        Ok(t.foods.get(&food_id).filter(|f| f.user_id == user_id).cloned())
    }

    async fn list_foods(&self, user_id: Uuid) -> Result<Vec<Food>, StoreError> {
        let t = self.inner.read().await;
        Ok(t.foods
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_food_favorite(
        &self,
        user_id: Uuid,
        food_id: Uuid,
        favorite: bool,
    ) -> Result<Option<Food>, StoreError> {
        let mut t = self.inner.write().await;
        Ok(t.foods
            .get_mut(&food_id)
            .filter(|f| f.user_id == user_id)
            .map(|f| {
                f.favorite = favorite;
                f.clone()
            }))
    }

    async fn count_foods(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let t = self.inner.read().await;
        Ok(t.foods.values().filter(|f| f.user_id == user_id).count() as i64)
    }

    async fn insert_meal(&self, meal: MealRecord) -> Result<MealRecord, StoreError> {
        let mut t = self.inner.write().await;
        t.meals.insert(meal.id, meal.clone());
        Ok(meal)
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.inner.write().await;
        let owned = t.meals.get(&meal_id).is_some_and(|m| m.user_id == user_id);
        if owned {
            t.meals.remove(&meal_id);
        }
        Ok(owned)
    }

    async fn list_meals(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<MealRecord>, StoreError> {
        let t = self.inner.read().await;
        Ok(t.meals
            .values()
            .filter(|m| m.user_id == user_id && in_range(range, m.date))
            .cloned()
            .collect())
    }

    async fn count_meals(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let t = self.inner.read().await;
        Ok(t.meals.values().filter(|m| m.user_id == user_id).count() as i64)
    }

    async fn upsert_habit(&self, habit: HabitRecord) -> Result<HabitRecord, StoreError> {
        let mut t = self.inner.write().await;
        t.habits
            .insert((habit.user_id, habit.date), habit.clone());
        Ok(habit)
    }

    async fn find_habit(
        &self,
        user_id: Uuid,
        date: CanonicalInstant,
    ) -> Result<Option<HabitRecord>, StoreError> {
        let t = self.inner.read().await;
        Ok(t.habits.get(&(user_id, date)).cloned())
    }

    async fn list_habits(
        &self,
        user_id: Uuid,
        range: Option<InstantRange>,
    ) -> Result<Vec<HabitRecord>, StoreError> {
        let t = self.inner.read().await;
        Ok(t.habits
            .values()
            .filter(|h| h.user_id == user_id && in_range(range, h.date))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::{parse_civil_date, to_canonical_instant},
        meals::repo_types::{MealTime, ServingSize},
    };

    fn new_food(user_id: Uuid, name: &str) -> NewFood {
        NewFood {
            user_id,
            name: name.into(),
            icon: "🍎".into(),
            calories: 95,
            protein: 0,
        }
    }

    fn meal(user_id: Uuid, date: &str) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id,
            food_id: Uuid::new_v4(),
            name: "Apple".into(),
            icon: "🍎".into(),
            calories: 95,
            protein: 0,
            serving_size: ServingSize::Whole,
            meal_time: MealTime::Snack,
            date: to_canonical_instant(parse_civil_date(date).unwrap()),
        }
    }

    #[tokio::test]
    async fn food_names_are_unique_per_user() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert_food(new_food(alice, "Apple")).await.unwrap();
        let err = store.insert_food(new_food(alice, "Apple")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        store.insert_food(new_food(bob, "Apple")).await.unwrap();
        assert_eq!(store.count_foods(alice).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn favorite_toggle_is_owner_scoped() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let food = store.insert_food(new_food(alice, "Apple")).await.unwrap();
        assert!(store
            .set_food_favorite(Uuid::new_v4(), food.id, true)
            .await
            .unwrap()
            .is_none());
        let updated = store.set_food_favorite(alice, food.id, true).await.unwrap();
        assert!(updated.unwrap().favorite);
    }

    #[tokio::test]
    async fn meal_range_query_is_half_open() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for d in ["2024-03-09", "2024-03-10", "2024-03-11"] {
            store.insert_meal(meal(user, d)).await.unwrap();
        }
        store.insert_meal(meal(Uuid::new_v4(), "2024-03-10")).await.unwrap();

        let day = parse_civil_date("2024-03-10").unwrap();
        let found = store
            .list_meals(user, Some(InstantRange::days(day, day)))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].date.civil_date(), day);
        assert_eq!(store.list_meals(user, None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_only_removes_own_meals() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let m = store.insert_meal(meal(user, "2024-01-05")).await.unwrap();
        assert!(!store.delete_meal(Uuid::new_v4(), m.id).await.unwrap());
        assert!(store.delete_meal(user, m.id).await.unwrap());
        assert!(!store.delete_meal(user, m.id).await.unwrap());
        assert_eq!(store.count_meals(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn habit_upsert_overwrites_same_date() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let date = to_canonical_instant(parse_civil_date("2024-01-05").unwrap());
        let mut habit = HabitRecord {
            user_id: user,
            date,
            workout_done: false,
            fruits_count: 1,
        };
        store.upsert_habit(habit.clone()).await.unwrap();
        habit.workout_done = true;
        habit.fruits_count = 2;
        store.upsert_habit(habit.clone()).await.unwrap();

        assert_eq!(store.list_habits(user, None).await.unwrap(), vec![habit.clone()]);
        assert_eq!(store.find_habit(user, date).await.unwrap(), Some(habit));
    }
}
