// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual workout and meal management.

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::meal::CreateMeal;
use crate::models::workout::CreateWorkout;
use crate::models::{DateRange, Meal, MealUpdate, Workout, WorkoutUpdate};
use crate::services::generator::{meal_time, workout_time};
use crate::time_utils::{parse_date_param, today_utc};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Default listing window when no end date is given.
const DEFAULT_LIST_DAYS: u64 = 7;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            patch(update_workout).delete(delete_workout),
        )
        .route("/api/meals", get(list_meals).post(create_meal))
        .route("/api/meals/{id}", patch(update_meal).delete(delete_meal))
}

/// Query parameters for listing; both ends inclusive.
#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub(crate) fn date_param(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date_param(s)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid {}: {}", name, s))),
        None => Ok(None),
    }
}

impl ListParams {
    fn range(&self) -> Result<DateRange> {
        let start = date_param(self.start_date.as_deref(), "start_date")?.unwrap_or_else(today_utc);
        match date_param(self.end_date.as_deref(), "end_date")? {
            Some(end) if end < start => Err(AppError::BadRequest(
                "end_date must not be before start_date".to_string(),
            )),
            Some(end) => Ok(DateRange::inclusive(start, end)),
            None => Ok(DateRange::days_from(start, DEFAULT_LIST_DAYS)),
        }
    }
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(what.to_string()))
}

// ─── Workouts ────────────────────────────────────────────────

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Workout>>> {
    let range = params.range()?;
    let workouts = state
        .store
        .list_workouts(user.user_id, range)
        .await
        .map_err(|e| AppError::store("Failed to fetch workouts", e))?;
    Ok(Json(workouts))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateWorkout>,
) -> Result<(StatusCode, Json<Workout>)> {
    body.validate()?;

    let created = state
        .store
        .insert_workouts(vec![body.into_new(user.user_id, workout_time())])
        .await
        .map_err(|e| AppError::store("Failed to create workout", e))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Database("Failed to create workout".to_string()))?;

    tracing::info!(user_id = %user.user_id, workout_id = %created.id, "Workout created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(update): AppJson<WorkoutUpdate>,
) -> Result<Json<Workout>> {
    let id = parse_id(&id, "Workout")?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    update.validate()?;

    state
        .store
        .update_workout(user.user_id, id, &update)
        .await
        .map_err(|e| AppError::store("Failed to update workout", e))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Workout".to_string()))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id, "Workout")?;
    let deleted = state
        .store
        .delete_workout(user.user_id, id)
        .await
        .map_err(|e| AppError::store("Failed to delete workout", e))?;

    if !deleted {
        return Err(AppError::NotFound("Workout".to_string()));
    }
    Ok(Json(DeleteResponse { success: true }))
}

// ─── Meals ───────────────────────────────────────────────────

async fn list_meals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Meal>>> {
    let range = params.range()?;
    let meals = state
        .store
        .list_meals(user.user_id, range)
        .await
        .map_err(|e| AppError::store("Failed to fetch meals", e))?;
    Ok(Json(meals))
}

async fn create_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateMeal>,
) -> Result<(StatusCode, Json<Meal>)> {
    body.validate()?;

    let default_time = meal_time(body.meal_type);
    let created = state
        .store
        .insert_meals(vec![body.into_new(user.user_id, default_time)])
        .await
        .map_err(|e| AppError::store("Failed to create meal", e))?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Database("Failed to create meal".to_string()))?;

    tracing::info!(user_id = %user.user_id, meal_id = %created.id, "Meal created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(update): AppJson<MealUpdate>,
) -> Result<Json<Meal>> {
    let id = parse_id(&id, "Meal")?;
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    update.validate()?;

    state
        .store
        .update_meal(user.user_id, id, &update)
        .await
        .map_err(|e| AppError::store("Failed to update meal", e))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Meal".to_string()))
}

async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id, "Meal")?;
    let deleted = state
        .store
        .delete_meal(user.user_id, id)
        .await
        .map_err(|e| AppError::store("Failed to delete meal", e))?;

    if !deleted {
        return Err(AppError::NotFound("Meal".to_string()));
    }
    Ok(Json(DeleteResponse { success: true }))
}
