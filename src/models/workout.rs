// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout model for storage and API.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One exercise inside a workout. Stored as JSON alongside the workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Load in pounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Free-form duration such as "60s" or "20 minutes"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Stored workout record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// strength, cardio, hiit, ...
    pub workout_type: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: Option<u32>,
    pub intensity: Option<String>,
    /// Ordered list of exercises
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub exercises: Vec<Exercise>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A workout that has not been persisted yet.
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkout {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub workout_type: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: Option<u32>,
    pub intensity: Option<String>,
    pub exercises: Vec<Exercise>,
}

impl NewWorkout {
    /// Materialize with a store-assigned id and timestamp.
    pub fn into_workout(self, id: Uuid, created_at: DateTime<Utc>) -> Workout {
        Workout {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            workout_type: self.workout_type,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            duration_minutes: self.duration_minutes,
            intensity: self.intensity,
            exercises: self.exercises,
            completed: false,
            created_at,
        }
    }
}

/// Request body for manual workout entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkout {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Workout type is required"))]
    pub workout_type: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    #[validate(range(min = 1, max = 600, message = "Duration must be 1-600 minutes"))]
    pub duration_minutes: Option<u32>,
    pub intensity: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub exercises: Vec<Exercise>,
}

impl CreateWorkout {
    pub fn into_new(self, user_id: Uuid, default_time: NaiveTime) -> NewWorkout {
        NewWorkout {
            user_id,
            title: self.title,
            description: self.description,
            workout_type: self.workout_type,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time.unwrap_or(default_time),
            duration_minutes: self.duration_minutes,
            intensity: self.intensity,
            exercises: self.exercises,
        }
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkoutUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 600, message = "Duration must be 1-600 minutes"))]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl WorkoutUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.scheduled_date.is_none()
            && self.scheduled_time.is_none()
            && self.duration_minutes.is_none()
            && self.intensity.is_none()
            && self.completed.is_none()
    }

    pub fn apply(&self, workout: &mut Workout) {
        if let Some(title) = &self.title {
            workout.title = title.clone();
        }
        if let Some(description) = &self.description {
            workout.description = Some(description.clone());
        }
        if let Some(date) = self.scheduled_date {
            workout.scheduled_date = date;
        }
        if let Some(time) = self.scheduled_time {
            workout.scheduled_time = time;
        }
        if let Some(duration) = self.duration_minutes {
            workout.duration_minutes = Some(duration);
        }
        if let Some(intensity) = &self.intensity {
            workout.intensity = Some(intensity.clone());
        }
        if let Some(completed) = self.completed {
            workout.completed = completed;
        }
    }
}
