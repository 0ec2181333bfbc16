// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sleep, weight and water intake tracking.

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::health::{CreateSleep, CreateWater, CreateWeight};
use crate::models::{DateBounds, HealthEntry, HealthMetric, NewHealthEntry};
use crate::routes::records::date_param;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health/sleep", get(list_sleep).post(track_sleep))
        .route("/api/health/weight", get(list_weight).post(track_weight))
        .route("/api/health/water", get(list_water).post(track_water))
}

/// Optional inclusive bounds; either end may be left open.
#[derive(Deserialize)]
pub struct BoundsParams {
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

impl BoundsParams {
    fn bounds(&self) -> Result<DateBounds> {
        let bounds = DateBounds {
            from: date_param(self.start_date.as_deref(), "start_date")?,
            to: date_param(self.end_date.as_deref(), "end_date")?,
        };
        if let (Some(from), Some(to)) = (bounds.from, bounds.to) {
            if to < from {
                return Err(AppError::BadRequest(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }
        Ok(bounds)
    }
}

async fn record(
    state: &AppState,
    entry: NewHealthEntry,
) -> Result<(StatusCode, Json<HealthEntry>)> {
    let metric = entry.reading.metric();
    let created = state
        .store
        .insert_health_entry(entry)
        .await
        .map_err(|e| AppError::store("Failed to save health entry", e))?;

    tracing::info!(
        user_id = %created.user_id,
        ?metric,
        date = %created.date,
        "Health entry recorded"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    state: &AppState,
    user: &AuthUser,
    metric: HealthMetric,
    params: &BoundsParams,
) -> Result<Json<Vec<HealthEntry>>> {
    let bounds = params.bounds()?;
    let entries = state
        .store
        .list_health_entries(user.user_id, metric, bounds)
        .await
        .map_err(|e| AppError::store("Failed to fetch health entries", e))?;
    Ok(Json(entries))
}

async fn track_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateSleep>,
) -> Result<(StatusCode, Json<HealthEntry>)> {
    body.validate()?;
    record(&state, body.into_new(user.user_id)).await
}

async fn list_sleep(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BoundsParams>,
) -> Result<Json<Vec<HealthEntry>>> {
    list(&state, &user, HealthMetric::Sleep, &params).await
}

async fn track_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateWeight>,
) -> Result<(StatusCode, Json<HealthEntry>)> {
    body.validate()?;
    record(&state, body.into_new(user.user_id)).await
}

async fn list_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BoundsParams>,
) -> Result<Json<Vec<HealthEntry>>> {
    list(&state, &user, HealthMetric::Weight, &params).await
}

async fn track_water(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateWater>,
) -> Result<(StatusCode, Json<HealthEntry>)> {
    body.validate()?;
    record(&state, body.into_new(user.user_id)).await
}

async fn list_water(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BoundsParams>,
) -> Result<Json<Vec<HealthEntry>>> {
    list(&state, &user, HealthMetric::Water, &params).await
}
