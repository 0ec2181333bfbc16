// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly view: workouts and meals merged per calendar day.

use crate::db::{DataStore, StoreResult};
use crate::models::{DateRange, Meal, Workout};
use crate::time_utils::format_hh_mm;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

pub const WORKOUT_COLOR: &str = "bg-blue-400";
pub const MEAL_COLOR: &str = "bg-green-400";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Workout,
    Meal,
}

/// One row in a day's agenda.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEntry {
    pub id: Uuid,
    /// `HH:MM`, 24-hour
    pub time: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    pub color: &'static str,
}

impl From<&Workout> for ScheduleEntry {
    fn from(w: &Workout) -> Self {
        Self {
            id: w.id,
            time: format_hh_mm(w.scheduled_time),
            kind: EntryKind::Workout,
            title: w.title.clone(),
            description: w.description.clone(),
            duration: w.duration_minutes,
            calories: None,
            color: WORKOUT_COLOR,
        }
    }
}

impl From<&Meal> for ScheduleEntry {
    fn from(m: &Meal) -> Self {
        Self {
            id: m.id,
            time: format_hh_mm(m.scheduled_time),
            kind: EntryKind::Meal,
            title: m.title.clone(),
            description: m.description.clone(),
            duration: None,
            calories: m.calories,
            color: MEAL_COLOR,
        }
    }
}

/// Date (`YYYY-MM-DD`) to that day's entries.
pub type DaySchedule = BTreeMap<String, Vec<ScheduleEntry>>;

/// Group by date and order each day by time of day.
///
/// Workouts go in before meals and the sort is stable, so entries sharing a
/// time keep that order.
pub fn merge(workouts: &[Workout], meals: &[Meal]) -> DaySchedule {
    let mut schedule = DaySchedule::new();

    for workout in workouts {
        schedule
            .entry(workout.scheduled_date.to_string())
            .or_default()
            .push(workout.into());
    }
    for meal in meals {
        schedule
            .entry(meal.scheduled_date.to_string())
            .or_default()
            .push(meal.into());
    }

    for entries in schedule.values_mut() {
        entries.sort_by(|a, b| a.time.cmp(&b.time));
    }

    schedule
}

/// Turn a failed fetch into an empty list. Missing tables are expected on a
/// fresh deployment and stay quiet.
fn soft_fail<T>(what: &str, result: StoreResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) if e.is_not_provisioned() => {
            tracing::debug!(what, "Table not provisioned, treating as empty");
            vec![]
        }
        Err(e) => {
            tracing::error!(error = %e, what, "Failed to fetch schedule records");
            vec![]
        }
    }
}

/// Fetch both record kinds for `range`; never fails.
pub async fn fetch_range(
    store: &dyn DataStore,
    user_id: Uuid,
    range: DateRange,
) -> (Vec<Workout>, Vec<Meal>) {
    let workouts = soft_fail("workouts", store.list_workouts(user_id, range).await);
    let meals = soft_fail("meals", store.list_meals(user_id, range).await);
    (workouts, meals)
}
