// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push the coming week's workouts and meals to Google Calendar.
//!
//! Pushes are sequential and best-effort. No event ids are stored, so every
//! run creates a new set of events.

use super::calendar::{meal_event, workout_event, CalendarProvider};
use super::schedule::EntryKind;
use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{integration::PROVIDER_GOOGLE_CALENDAR, DateRange, ExternalIntegration};
use chrono::{DateTime, Days, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Days ahead of today covered by a sync, today included.
pub const SYNC_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct SyncedItem {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub synced: usize,
    pub events: Vec<SyncedItem>,
}

/// Return a usable access token, refreshing and persisting it first if the
/// stored one has expired.
async fn access_token(
    store: &dyn DataStore,
    calendar: &dyn CalendarProvider,
    integration: &ExternalIntegration,
    now: DateTime<Utc>,
) -> Result<String> {
    if !integration.is_expired(now) {
        return Ok(integration.access_token.clone());
    }

    let refresh = integration
        .refresh_token
        .as_deref()
        .ok_or_else(|| AppError::Upstream("No refresh token stored".to_string()))?;

    tracing::info!(integration_id = %integration.id, "Access token expired, refreshing");
    let tokens = calendar.refresh_token(refresh).await?;
    let expires_at = now + Duration::seconds(tokens.expires_in);

    store
        .update_integration_token(integration.id, &tokens.access_token, expires_at)
        .await
        .map_err(|e| AppError::store("Failed to update integration", e))?;

    Ok(tokens.access_token)
}

/// Sync the window `[today, today + 7]` for `user_id`.
pub async fn sync_upcoming(
    store: &dyn DataStore,
    calendar: &dyn CalendarProvider,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<SyncReport> {
    let integration = store
        .find_active_integration(user_id, PROVIDER_GOOGLE_CALENDAR)
        .await
        .map_err(|e| AppError::store("Failed to fetch integration", e))?
        .ok_or_else(|| AppError::BadRequest("Google Calendar not connected".to_string()))?;

    let token = access_token(store, calendar, &integration, now).await?;

    let today = now.date_naive();
    let last = today
        .checked_add_days(Days::new(SYNC_WINDOW_DAYS))
        .unwrap_or(today);
    let range = DateRange::inclusive(today, last);

    let workouts = store.list_workouts(user_id, range).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load workouts for sync");
        vec![]
    });
    let meals = store.list_meals(user_id, range).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load meals for sync");
        vec![]
    });

    let mut events = Vec::with_capacity(workouts.len() + meals.len());

    for workout in &workouts {
        match calendar.insert_event(&token, &workout_event(workout)).await {
            Ok(()) => events.push(SyncedItem {
                kind: EntryKind::Workout,
                name: workout.title.clone(),
            }),
            Err(e) => {
                tracing::warn!(error = %e, workout_id = %workout.id, "Skipping workout event")
            }
        }
    }

    for meal in &meals {
        match calendar.insert_event(&token, &meal_event(meal)).await {
            Ok(()) => events.push(SyncedItem {
                kind: EntryKind::Meal,
                name: meal.title.clone(),
            }),
            Err(e) => tracing::warn!(error = %e, meal_id = %meal.id, "Skipping meal event"),
        }
    }

    if let Err(e) = store.mark_integration_synced(integration.id, now).await {
        tracing::warn!(error = %e, "Failed to update last_synced_at");
    }

    tracing::info!(
        user_id = %user_id,
        synced = events.len(),
        attempted = workouts.len() + meals.len(),
        "Calendar sync finished"
    );

    Ok(SyncReport {
        synced: events.len(),
        events,
    })
}
