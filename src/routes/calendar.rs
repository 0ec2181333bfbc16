// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Calendar integration routes.

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{integration::PROVIDER_GOOGLE_CALENDAR, IntegrationSummary};
use crate::services::sync::{self, SyncedItem};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calendar/status", get(status))
        .route("/api/calendar/sync", post(sync_calendar))
        .route("/api/calendar/disconnect", post(disconnect))
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    pub integration: Option<IntegrationSummary>,
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub synced: usize,
    pub events: Vec<SyncedItem>,
}

#[derive(Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub disconnected: bool,
}

/// Whether an active calendar integration exists.
async fn status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<StatusResponse> {
    let integration = match state
        .store
        .find_active_integration(user.user_id, PROVIDER_GOOGLE_CALENDAR)
        .await
    {
        Ok(found) => found,
        Err(e) => {
            if !e.is_not_provisioned() {
                tracing::error!(error = %e, "Error checking calendar status");
            }
            None
        }
    };

    Json(StatusResponse {
        connected: integration.is_some(),
        integration: integration.map(|i| i.summary()),
    })
}

async fn sync_calendar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    let report = sync::sync_upcoming(
        state.store.as_ref(),
        state.calendar.as_ref(),
        user.user_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(SyncResponse {
        success: true,
        synced: report.synced,
        events: report.events,
    }))
}

async fn disconnect(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DisconnectResponse>> {
    let disconnected = state
        .store
        .deactivate_integration(user.user_id, PROVIDER_GOOGLE_CALENDAR)
        .await
        .map_err(|e| AppError::store("Failed to disconnect calendar", e))?;

    tracing::info!(user_id = %user.user_id, disconnected, "Calendar disconnect requested");

    Ok(Json(DisconnectResponse {
        success: true,
        disconnected,
    }))
}
