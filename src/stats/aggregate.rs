//! Folding raw meal and habit records into per-day rollups.
//!
//! Everything here is pure and total: missing data yields defaulted stats,
//! never an error.

use std::collections::{BTreeMap, HashMap};

use crate::{
    dates::CivilDate,
    habits::repo_types::HabitRecord,
    meals::repo_types::MealRecord,
    stats::dto::{DailyStats, ProfileStats},
};

pub const DEFAULT_WINDOW_DAYS: u32 = 14;

pub fn aggregate_day(
    date: CivilDate,
    meals: Vec<MealRecord>,
    habit: Option<&HabitRecord>,
) -> DailyStats {
    let total_calories = meals.iter().map(|m| m.calories).fold(0, i64::saturating_add);
    let total_protein = meals.iter().map(|m| m.protein).fold(0, i64::saturating_add);
    DailyStats {
        date,
        total_calories,
        total_protein,
        meals,
        workout_done: habit.is_some_and(|h| h.workout_done),
        fruits_count: habit.map_or(0, |h| h.fruits_count),
    }
}

/// Partitions meals by civil date. Order inside a group is unspecified.
pub fn group_by_date(meals: Vec<MealRecord>) -> BTreeMap<CivilDate, Vec<MealRecord>> {
    let mut groups: BTreeMap<CivilDate, Vec<MealRecord>> = BTreeMap::new();
    for meal in meals {
        groups.entry(meal.date.civil_date()).or_default().push(meal);
    }
    groups
}

/// Display order within a day: meal-time slot, then name.
pub fn sort_for_display(meals: &mut [MealRecord]) {
    meals.sort_by(|a, b| (a.meal_time, &a.name).cmp(&(b.meal_time, &b.name)));
}

fn index_habits(habits: &[HabitRecord]) -> HashMap<CivilDate, &HabitRecord> {
    habits.iter().map(|h| (h.date.civil_date(), h)).collect()
}

/// One entry per date that has meals, newest first.
///
/// Days with a habit record but no meals are left out: the history view is
/// meal-centric. `build_trailing_window` fills such days instead.
pub fn build_history(meals: Vec<MealRecord>, habits: &[HabitRecord]) -> Vec<DailyStats> {
    let habits = index_habits(habits);
    group_by_date(meals)
        .into_iter()
        .rev()
        .map(|(date, mut day)| {
            sort_for_display(&mut day);
            aggregate_day(date, day, habits.get(&date).copied())
        })
        .collect()
}

/// Exactly `window_size` consecutive days ending at `anchor`, oldest first,
/// with empty days filled in. Records outside the window are ignored.
pub fn build_trailing_window(
    meals: Vec<MealRecord>,
    habits: &[HabitRecord],
    window_size: u32,
    anchor: CivilDate,
) -> Vec<DailyStats> {
    let Some(first) = window_size
        .checked_sub(1)
        .and_then(|back| anchor.days_before(back))
    else {
        return Vec::new();
    };

    let habits = index_habits(habits);
    let mut groups = group_by_date(meals);
    let mut window = Vec::with_capacity(window_size as usize);
    let mut date = first;
    loop {
        let mut day = groups.remove(&date).unwrap_or_default();
        sort_for_display(&mut day);
        window.push(aggregate_day(date, day, habits.get(&date).copied()));
        if date >= anchor {
            break;
        }
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
    }
    window
}

/// Lifetime totals for the profile page.
pub fn profile_totals(meal_count: i64, food_count: i64, habits: &[HabitRecord]) -> ProfileStats {
    ProfileStats {
        meals_eaten: meal_count,
        foods_saved: food_count,
        workouts_logged: habits.iter().filter(|h| h.workout_done).count() as i64,
        fruits_eaten: habits
            .iter()
            .map(|h| i64::from(h.fruits_count))
            .fold(0, i64::saturating_add),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::{parse_civil_date, to_canonical_instant},
        meals::repo_types::{MealTime, ServingSize},
    };
    use uuid::Uuid;

    fn day(s: &str) -> CivilDate {
        parse_civil_date(s).unwrap()
    }

    fn meal(date: &str, name: &str, meal_time: MealTime, calories: i64, protein: i64) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            food_id: Uuid::new_v4(),
            name: name.into(),
            icon: "🍽".into(),
            calories,
            protein,
            serving_size: ServingSize::Whole,
            meal_time,
            date: to_canonical_instant(day(date)),
        }
    }

    fn habit(date: &str, workout_done: bool, fruits_count: u8) -> HabitRecord {
        HabitRecord {
            user_id: Uuid::nil(),
            date: to_canonical_instant(day(date)),
            workout_done,
            fruits_count,
        }
    }

    #[test]
    fn sums_calories_for_a_day() {
        let meals = vec![
            meal("2024-01-05", "Pasta", MealTime::Dinner, 400, 15),
            meal("2024-01-05", "Yogurt", MealTime::Snack, 120, 10),
        ];
        let stats = aggregate_day(day("2024-01-05"), meals, None);
        assert_eq!(stats.total_calories, 520);
        assert_eq!(stats.total_protein, 25);
        assert!(!stats.workout_done);
        assert_eq!(stats.fruits_count, 0);
    }

    #[test]
    fn totals_ignore_meal_order() {
        let meals = vec![
            meal("2024-01-05", "A", MealTime::Breakfast, 310, 12),
            meal("2024-01-05", "B", MealTime::Lunch, 45, 1),
            meal("2024-01-05", "C", MealTime::Dinner, 980, 60),
            meal("2024-01-05", "D", MealTime::Snack, 7, 0),
        ];
        let expected = aggregate_day(day("2024-01-05"), meals.clone(), None);
        for rotation in 0..meals.len() {
            let mut shuffled = meals.clone();
            shuffled.rotate_left(rotation);
            shuffled.reverse();
            let got = aggregate_day(day("2024-01-05"), shuffled, None);
            assert_eq!(got.total_calories, expected.total_calories);
            assert_eq!(got.total_protein, expected.total_protein);
        }
    }

    #[test]
    fn oversized_totals_saturate_instead_of_overflowing() {
        let big = i64::MAX / 2 + 1;
        let meals = vec![
            meal("2024-01-05", "A", MealTime::Lunch, big, big),
            meal("2024-01-05", "B", MealTime::Dinner, big, 1),
        ];
        let stats = aggregate_day(day("2024-01-05"), meals, None);
        assert_eq!(stats.total_calories, i64::MAX);
        assert_eq!(stats.total_protein, i64::MAX);
    }

    #[test]
    fn habit_fields_come_from_the_record() {
        let h = habit("2024-01-05", true, 2);
        let stats = aggregate_day(day("2024-01-05"), Vec::new(), Some(&h));
        assert!(stats.workout_done);
        assert_eq!(stats.fruits_count, 2);
        assert_eq!(stats.total_calories, 0);
    }

    #[test]
    fn groups_across_dst_dates() {
        let meals = vec![
            meal("2024-03-09", "A", MealTime::Lunch, 1, 0),
            meal("2024-03-10", "B", MealTime::Lunch, 2, 0),
            meal("2024-03-10", "C", MealTime::Lunch, 3, 0),
        ];
        let groups = group_by_date(meals);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&day("2024-03-09")].len(), 1);
        assert_eq!(groups[&day("2024-03-10")].len(), 2);
    }

    #[test]
    fn display_order_is_slot_then_name() {
        let mut meals = vec![
            meal("2024-01-05", "Toast", MealTime::Breakfast, 1, 0),
            meal("2024-01-05", "Chips", MealTime::Snack, 1, 0),
            meal("2024-01-05", "Eggs", MealTime::Breakfast, 1, 0),
            meal("2024-01-05", "Soup", MealTime::Lunch, 1, 0),
        ];
        sort_for_display(&mut meals);
        let names: Vec<_> = meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Eggs", "Toast", "Soup", "Chips"]);
    }

    #[test]
    fn history_is_newest_first_and_skips_habit_only_days() {
        let meals = vec![
            meal("2024-01-03", "A", MealTime::Lunch, 100, 1),
            meal("2024-01-05", "B", MealTime::Lunch, 200, 2),
            meal("2024-01-05", "C", MealTime::Dinner, 300, 3),
        ];
        let habits = vec![
            habit("2024-01-04", true, 2),
            habit("2024-01-05", true, 1),
        ];
        let history = build_history(meals, &habits);

        let dates: Vec<_> = history.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-05", "2024-01-03"]);
        assert_eq!(history[0].total_calories, 500);
        assert!(history[0].workout_done);
        assert_eq!(history[0].fruits_count, 1);
        assert!(!history[1].workout_done);
        assert_eq!(history[1].fruits_count, 0);
    }

    #[test]
    fn history_of_nothing_is_empty() {
        assert!(build_history(Vec::new(), &[habit("2024-01-04", true, 2)]).is_empty());
    }

    #[test]
    fn empty_window_is_fully_filled() {
        let window = build_trailing_window(Vec::new(), &[], 14, day("2024-06-15"));
        assert_eq!(window.len(), 14);
        assert_eq!(window[0].date.to_string(), "2024-06-02");
        assert_eq!(window[13].date.to_string(), "2024-06-15");
        let mut expected = day("2024-06-02");
        for stats in &window {
            assert_eq!(*stats, DailyStats::empty(expected));
            expected = expected.next_day().unwrap();
        }
    }

    #[test]
    fn window_places_records_and_drops_outsiders() {
        let meals = vec![
            meal("2024-06-01", "Too early", MealTime::Lunch, 999, 9),
            meal("2024-06-02", "First", MealTime::Lunch, 100, 1),
            meal("2024-06-15", "Last", MealTime::Dinner, 200, 2),
            meal("2024-06-16", "Too late", MealTime::Lunch, 999, 9),
        ];
        let habits = vec![habit("2024-06-10", true, 2), habit("2024-05-30", true, 1)];
        let window = build_trailing_window(meals, &habits, 14, day("2024-06-15"));

        assert_eq!(window.len(), 14);
        assert_eq!(window[0].total_calories, 100);
        assert_eq!(window[13].total_calories, 200);
        let habit_day = &window[8];
        assert_eq!(habit_day.date.to_string(), "2024-06-10");
        assert!(habit_day.workout_done);
        assert_eq!(habit_day.total_calories, 0);
        let total: i64 = window.iter().map(|d| d.total_calories).sum();
        assert_eq!(total, 300);
        assert_eq!(window.iter().filter(|d| d.workout_done).count(), 1);
    }

    #[test]
    fn window_crosses_month_and_dst_boundaries() {
        let window = build_trailing_window(Vec::new(), &[], 3, day("2024-03-11"));
        let dates: Vec<_> = window.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-03-09", "2024-03-10", "2024-03-11"]);

        let window = build_trailing_window(Vec::new(), &[], 2, day("2024-03-01"));
        let dates: Vec<_> = window.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn zero_sized_window_is_empty() {
        assert!(build_trailing_window(Vec::new(), &[], 0, day("2024-06-15")).is_empty());
    }

    #[test]
    fn profile_totals_count_workouts_and_fruits() {
        let habits = vec![
            habit("2024-01-01", true, 2),
            habit("2024-01-02", false, 1),
            habit("2024-01-03", true, 0),
        ];
        let totals = profile_totals(12, 4, &habits);
        assert_eq!(
            totals,
            ProfileStats {
                meals_eaten: 12,
                foods_saved: 4,
                workouts_logged: 2,
                fruits_eaten: 3,
            }
        );
    }
}
