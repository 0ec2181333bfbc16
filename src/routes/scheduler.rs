// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Schedule generation routes.

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::{Meal, Workout};
use crate::services::generator::{self, DayPlan, DEFAULT_DAYS_PER_WEEK, MEAL_DAYS};
use crate::time_utils::parse_date_param;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/scheduler/daily", post(generate_daily))
        .route("/api/scheduler/weekly", post(generate_weekly))
}

/// Dates arrive as strings so a missing or blank value gets a specific
/// message instead of a deserialization error.
#[derive(Deserialize)]
pub struct DailyRequest {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Serialize)]
pub struct DailySchedule {
    pub date: String,
    pub workouts: Vec<Workout>,
    pub meals: Vec<Meal>,
}

#[derive(Serialize)]
pub struct DailyResponse {
    pub success: bool,
    pub schedule: DailySchedule,
}

#[derive(Deserialize, Validate)]
pub struct WeeklyRequest {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 7, message = "Days per week must be between 1 and 7"))]
    days_per_week: Option<u32>,
}

#[derive(Serialize)]
pub struct WeeklySchedule {
    pub start_date: String,
    pub days_per_week: u32,
    pub days: Vec<DayPlan>,
}

#[derive(Serialize)]
pub struct WeeklyResponse {
    pub success: bool,
    pub schedule: WeeklySchedule,
}

fn required_date(raw: Option<&str>, missing: &str) -> Result<chrono::NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(missing.to_string()))?;
    parse_date_param(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid date: {}", raw)))
}

async fn generate_daily(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<DailyRequest>,
) -> Result<Json<DailyResponse>> {
    let date = required_date(body.date.as_deref(), "Date is required")?;

    let plan = generator::daily(user.user_id, date);
    let (workouts, meals) = generator::save(state.store.as_ref(), plan).await?;

    tracing::info!(user_id = %user.user_id, %date, "Generated daily schedule");

    Ok(Json(DailyResponse {
        success: true,
        schedule: DailySchedule {
            date: date.to_string(),
            workouts,
            meals,
        },
    }))
}

async fn generate_weekly(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<WeeklyRequest>,
) -> Result<Json<WeeklyResponse>> {
    let start = required_date(body.start_date.as_deref(), "Start date is required")?;
    body.validate()?;
    let days_per_week = body.days_per_week.unwrap_or(DEFAULT_DAYS_PER_WEEK);

    let plan = generator::weekly(user.user_id, start, days_per_week)?;
    let (workouts, meals) = generator::save(state.store.as_ref(), plan).await?;

    tracing::info!(
        user_id = %user.user_id,
        %start,
        days_per_week,
        workouts = workouts.len(),
        meals = meals.len(),
        "Generated weekly schedule"
    );

    Ok(Json(WeeklyResponse {
        success: true,
        schedule: WeeklySchedule {
            start_date: start.to_string(),
            days_per_week,
            days: generator::group_by_day(start, MEAL_DAYS, &workouts, &meals),
        },
    }))
}
