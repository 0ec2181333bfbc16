// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal model for storage and API.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Stored meal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meal_type: MealType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub calories: Option<u32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A meal that has not been persisted yet.
#[derive(Debug, Clone, Serialize)]
pub struct NewMeal {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meal_type: MealType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub calories: Option<u32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

impl NewMeal {
    /// Materialize with a store-assigned id and timestamp.
    pub fn into_meal(self, id: Uuid, created_at: DateTime<Utc>) -> Meal {
        Meal {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            meal_type: self.meal_type,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            ingredients: self.ingredients,
            instructions: self.instructions,
            completed: false,
            created_at,
        }
    }
}

/// Request body for manual meal entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMeal {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub meal_type: MealType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    #[validate(range(max = 10000, message = "Calories must be at most 10000"))]
    pub calories: Option<u32>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

impl CreateMeal {
    pub fn into_new(self, user_id: Uuid, default_time: NaiveTime) -> NewMeal {
        NewMeal {
            user_id,
            title: self.title,
            description: self.description,
            meal_type: self.meal_type,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time.unwrap_or(default_time),
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            ingredients: self.ingredients,
            instructions: self.instructions,
        }
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MealUpdate {
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
    #[validate(range(max = 10000, message = "Calories must be at most 10000"))]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl MealUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.scheduled_date.is_none()
            && self.scheduled_time.is_none()
            && self.calories.is_none()
            && self.completed.is_none()
    }

    pub fn apply(&self, meal: &mut Meal) {
        if let Some(title) = &self.title {
            meal.title = title.clone();
        }
        if let Some(description) = &self.description {
            meal.description = Some(description.clone());
        }
        if let Some(date) = self.scheduled_date {
            meal.scheduled_date = date;
        }
        if let Some(time) = self.scheduled_time {
            meal.scheduled_time = time;
        }
        if let Some(calories) = self.calories {
            meal.calories = Some(calories);
        }
        if let Some(completed) = self.completed {
            meal.completed = completed;
        }
    }
}
