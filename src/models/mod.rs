// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod health;
pub mod integration;
pub mod meal;
pub mod profile;
pub mod workout;

pub use health::{DateBounds, HealthEntry, HealthMetric, HealthReading, NewHealthEntry};
pub use integration::{ExternalIntegration, IntegrationSummary, NewIntegration};
pub use meal::{Meal, MealType, MealUpdate, NewMeal};
pub use profile::{Profile, TagKind};
pub use workout::{Exercise, NewWorkout, Workout, WorkoutUpdate};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` the same as a missing key. Nullable JSON and
/// array columns come back from the REST backend as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Half-open date range `[start, end)` used for schedule queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `days` calendar days starting at `start`.
    pub fn days_from(start: NaiveDate, days: u64) -> Self {
        Self {
            start,
            end: start.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Both ends included.
    pub fn inclusive(start: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start,
            end: last.succ_opt().unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}
