// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Template-based schedule generation.
//!
//! Day `i` of a schedule takes template `i mod len` from each pool. Nothing
//! is random and the user's profile is not consulted, so the same inputs
//! always produce the same records.

use super::templates::{self, MealTemplate, WorkoutTemplate};
use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{Meal, MealType, NewMeal, NewWorkout, Workout};
use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

pub const DEFAULT_DAYS_PER_WEEK: u32 = 4;
pub const MAX_DAYS_PER_WEEK: u32 = 7;
/// Meals are always planned for a full week.
pub const MEAL_DAYS: u32 = 7;

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

pub fn workout_time() -> NaiveTime {
    at(9, 0)
}

pub fn meal_time(meal_type: MealType) -> NaiveTime {
    match meal_type {
        MealType::Breakfast => at(7, 30),
        MealType::Lunch => at(12, 30),
        MealType::Dinner => at(18, 30),
        MealType::Snack => at(15, 30),
    }
}

/// Records ready for bulk insert.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSchedule {
    pub workouts: Vec<NewWorkout>,
    pub meals: Vec<NewMeal>,
}

/// Persisted records grouped for one calendar day.
#[derive(Debug, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub workouts: Vec<Workout>,
    pub meals: Vec<Meal>,
}

fn day(start: NaiveDate, offset: u32) -> Result<NaiveDate> {
    start
        .checked_add_days(Days::new(offset.into()))
        .ok_or_else(|| AppError::BadRequest("Start date is out of range".to_string()))
}

fn workout_from(
    template: &WorkoutTemplate,
    user_id: Uuid,
    date: NaiveDate,
) -> NewWorkout {
    NewWorkout {
        user_id,
        title: template.title.to_string(),
        description: Some(template.description.to_string()),
        workout_type: template.workout_type.to_string(),
        scheduled_date: date,
        scheduled_time: workout_time(),
        duration_minutes: Some(template.duration_minutes),
        intensity: Some(template.intensity.to_string()),
        exercises: template
            .exercises
            .iter()
            .map(|e| e.to_exercise())
            .collect(),
    }
}

fn meal_from(
    template: &MealTemplate,
    meal_type: MealType,
    user_id: Uuid,
    date: NaiveDate,
) -> NewMeal {
    NewMeal {
        user_id,
        title: template.title.to_string(),
        description: Some(template.description.to_string()),
        meal_type,
        scheduled_date: date,
        scheduled_time: meal_time(meal_type),
        calories: Some(template.calories),
        protein_g: Some(template.protein_g),
        carbs_g: Some(template.carbs_g),
        fat_g: Some(template.fat_g),
        ingredients: template.ingredients.iter().map(|i| i.to_string()).collect(),
        instructions: None,
    }
}

/// Plan a week starting at `start`: `days_per_week` workouts on consecutive
/// days and three meals on each of the seven days.
pub fn weekly(user_id: Uuid, start: NaiveDate, days_per_week: u32) -> Result<GeneratedSchedule> {
    if !(1..=MAX_DAYS_PER_WEEK).contains(&days_per_week) {
        return Err(AppError::BadRequest(format!(
            "days_per_week must be between 1 and {}",
            MAX_DAYS_PER_WEEK
        )));
    }

    let mut schedule = GeneratedSchedule::default();

    for offset in 0..days_per_week {
        let template = templates::pick(&templates::WEEKLY_WORKOUTS, offset as usize);
        schedule
            .workouts
            .push(workout_from(template, user_id, day(start, offset)?));
    }

    for offset in 0..MEAL_DAYS {
        let date = day(start, offset)?;
        let idx = offset as usize;
        let courses = [
            (MealType::Breakfast, templates::pick(&templates::WEEKLY_BREAKFASTS, idx)),
            (MealType::Lunch, templates::pick(&templates::WEEKLY_LUNCHES, idx)),
            (MealType::Dinner, templates::pick(&templates::WEEKLY_DINNERS, idx)),
        ];
        for (meal_type, template) in courses {
            schedule
                .meals
                .push(meal_from(template, meal_type, user_id, date));
        }
    }

    Ok(schedule)
}

/// Plan a single day: one workout plus breakfast, lunch and dinner.
pub fn daily(user_id: Uuid, date: NaiveDate) -> GeneratedSchedule {
    GeneratedSchedule {
        workouts: vec![workout_from(
            templates::pick(&templates::DAILY_WORKOUTS, 0),
            user_id,
            date,
        )],
        meals: vec![
            meal_from(
                templates::pick(&templates::DAILY_BREAKFASTS, 0),
                MealType::Breakfast,
                user_id,
                date,
            ),
            meal_from(
                templates::pick(&templates::DAILY_LUNCHES, 0),
                MealType::Lunch,
                user_id,
                date,
            ),
            meal_from(
                templates::pick(&templates::DAILY_DINNERS, 0),
                MealType::Dinner,
                user_id,
                date,
            ),
        ],
    }
}

/// Insert workouts then meals. A failure in either aborts; rows from an
/// earlier successful insert stay in place.
pub async fn save(
    store: &dyn DataStore,
    schedule: GeneratedSchedule,
) -> Result<(Vec<Workout>, Vec<Meal>)> {
    let workout_count = schedule.workouts.len();
    let workouts = store
        .insert_workouts(schedule.workouts)
        .await
        .map_err(|e| AppError::store("Failed to create workouts", e))?;

    let meals = store
        .insert_meals(schedule.meals)
        .await
        .map_err(|e| AppError::store("Failed to create meals", e))?;

    tracing::debug!(
        workouts = workout_count,
        meals = meals.len(),
        "Saved generated schedule"
    );

    Ok((workouts, meals))
}

/// Bucket persisted records into `days` consecutive days from `start`.
pub fn group_by_day(
    start: NaiveDate,
    days: u32,
    workouts: &[Workout],
    meals: &[Meal],
) -> Vec<DayPlan> {
    start
        .iter_days()
        .take(days as usize)
        .map(|date| DayPlan {
            date,
            workouts: workouts
                .iter()
                .filter(|w| w.scheduled_date == date)
                .cloned()
                .collect(),
            meals: meals
                .iter()
                .filter(|m| m.scheduled_date == date)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_weekly_counts() {
        let user = Uuid::new_v4();
        for days in 1..=7 {
            let schedule = weekly(user, jan(1), days).unwrap();
            assert_eq!(schedule.workouts.len(), days as usize);
            assert_eq!(schedule.meals.len(), 21);
        }
    }

    #[test]
    fn test_weekly_rotation_wraps_around_pool() {
        let schedule = weekly(Uuid::new_v4(), jan(1), 6).unwrap();
        let titles: Vec<&str> = schedule.workouts.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Upper Body Strength",
                "Lower Body Power",
                "Full Body Circuit",
                "Core & Cardio",
                "Upper Body Strength",
                "Lower Body Power",
            ]
        );
        for (i, workout) in schedule.workouts.iter().enumerate() {
            assert_eq!(workout.scheduled_date, jan(1 + i as u32));
            assert_eq!(workout.scheduled_time, at(9, 0));
        }
    }

    #[test]
    fn test_meal_pools_cycle_independently() {
        let schedule = weekly(Uuid::new_v4(), jan(1), 4).unwrap();
        let breakfasts: Vec<&str> = schedule
            .meals
            .iter()
            .filter(|m| m.meal_type == MealType::Breakfast)
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(breakfasts.len(), 7);
        assert_eq!(breakfasts[0], "Protein Pancakes");
        assert_eq!(breakfasts[3], "Protein Pancakes");
        assert_eq!(breakfasts[5], "Greek Yogurt Bowl");

        let day_four: Vec<_> = schedule
            .meals
            .iter()
            .filter(|m| m.scheduled_date == jan(4))
            .map(|m| (m.meal_type, m.scheduled_time))
            .collect();
        assert_eq!(
            day_four,
            vec![
                (MealType::Breakfast, at(7, 30)),
                (MealType::Lunch, at(12, 30)),
                (MealType::Dinner, at(18, 30)),
            ]
        );
    }

    #[test]
    fn test_weekly_rejects_out_of_range_days() {
        assert!(weekly(Uuid::new_v4(), jan(1), 0).is_err());
        assert!(weekly(Uuid::new_v4(), jan(1), 8).is_err());
    }

    #[test]
    fn test_core_cardio_keeps_timed_exercises() {
        let schedule = weekly(Uuid::new_v4(), jan(1), 4).unwrap();
        let core = &schedule.workouts[3];
        assert_eq!(core.exercises[0].duration.as_deref(), Some("60s"));
        assert_eq!(core.exercises[2].sets, None);
        assert_eq!(core.exercises[2].duration.as_deref(), Some("20 minutes"));
    }

    #[test]
    fn test_daily_plan() {
        let schedule = daily(Uuid::new_v4(), jan(15));
        assert_eq!(schedule.workouts.len(), 1);
        assert_eq!(schedule.workouts[0].title, "Full Body Strength Training");
        assert_eq!(schedule.workouts[0].exercises[2].weight, Some(185.0));
        assert_eq!(schedule.meals.len(), 3);
        assert!(schedule.meals.iter().all(|m| m.scheduled_date == jan(15)));
        assert_eq!(schedule.meals[0].ingredients.len(), 4);
    }
}
