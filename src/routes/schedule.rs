// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly schedule view.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::DateRange;
use crate::services::schedule::{self, DaySchedule};
use crate::time_utils::{parse_date_param, today_utc};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Length of the weekly view in days.
const VIEW_DAYS: u64 = 7;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/schedule/weekly", get(get_weekly))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyParams {
    #[serde(default)]
    start_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScheduleSummary {
    pub total_workouts: usize,
    pub total_meals: usize,
    pub total_events: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyView {
    pub start_date: String,
    pub end_date: String,
    pub schedule: DaySchedule,
    pub summary: ScheduleSummary,
}

/// Merged agenda for `[startDate, startDate + 7 days)`.
async fn get_weekly(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WeeklyParams>,
) -> Result<Json<WeeklyView>> {
    let start = match params.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_date_param(raw)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid startDate: {}", raw)))?,
        None => today_utc(),
    };
    let range = DateRange::days_from(start, VIEW_DAYS);

    let (workouts, meals) = schedule::fetch_range(state.store.as_ref(), user.user_id, range).await;

    let summary = ScheduleSummary {
        total_workouts: workouts.len(),
        total_meals: meals.len(),
        total_events: workouts.len() + meals.len(),
    };

    tracing::debug!(
        user_id = %user.user_id,
        %start,
        events = summary.total_events,
        "Weekly schedule fetched"
    );

    Ok(Json(WeeklyView {
        start_date: range.start.to_string(),
        end_date: range.end.to_string(),
        schedule: schedule::merge(&workouts, &meals),
        summary,
    }))
}
