// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Calendar API client and event mapping.

use crate::error::AppError;
use crate::models::{Meal, Workout};
use crate::time_utils::{format_utc_rfc3339, scheduled_at};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const SCOPES: &str =
    "https://www.googleapis.com/auth/calendar https://www.googleapis.com/auth/calendar.events";

const DEFAULT_WORKOUT_MINUTES: u32 = 60;
const MEAL_MINUTES: i64 = 30;
/// Blueberry
const WORKOUT_COLOR_ID: &str = "9";
/// Basil
const MEAL_COLOR_ID: &str = "10";

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Event payload for `events.insert`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
    pub color_id: String,
}

/// Calendar provider operations used by the OAuth and sync flows.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Exchange an authorization code for tokens.
    async fn exchange_code(&self, code: &str, redirect_uri: &str)
        -> Result<TokenResponse, AppError>;

    /// Obtain a fresh access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError>;

    /// Create one event in the user's primary calendar.
    async fn insert_event(&self, access_token: &str, event: &CalendarEvent)
        -> Result<(), AppError>;
}

fn event(
    summary: String,
    description: Option<&str>,
    start: DateTime<Utc>,
    minutes: i64,
    color_id: &str,
) -> CalendarEvent {
    let end = start + Duration::minutes(minutes);
    CalendarEvent {
        summary,
        description: description.unwrap_or_default().to_string(),
        start: EventTime {
            date_time: format_utc_rfc3339(start),
            time_zone: "UTC".to_string(),
        },
        end: EventTime {
            date_time: format_utc_rfc3339(end),
            time_zone: "UTC".to_string(),
        },
        color_id: color_id.to_string(),
    }
}

pub fn workout_event(workout: &Workout) -> CalendarEvent {
    let minutes = workout.duration_minutes.unwrap_or(DEFAULT_WORKOUT_MINUTES);
    event(
        format!("🏋️ {}", workout.title),
        workout.description.as_deref(),
        scheduled_at(workout.scheduled_date, workout.scheduled_time),
        i64::from(minutes),
        WORKOUT_COLOR_ID,
    )
}

pub fn meal_event(meal: &Meal) -> CalendarEvent {
    event(
        format!("🍽️ {}", meal.title),
        meal.description.as_deref(),
        scheduled_at(meal.scheduled_date, meal.scheduled_time),
        MEAL_MINUTES,
        MEAL_COLOR_ID,
    )
}

/// Consent-screen URL requesting offline calendar access.
pub fn authorization_url(client_id: &str, redirect_uri: &str, state: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
        AUTHORIZE_URL,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(SCOPES),
        urlencoding::encode(state),
    )
}

/// Google OAuth + Calendar REST client.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GoogleCalendarClient {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http,
            client_id,
            client_secret,
        })
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Ok((id.as_str(), secret.as_str())),
            _ => Err(AppError::NotConfigured(
                "Google OAuth not configured. Please add GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET to environment variables.".to_string(),
            )),
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token endpoint rejected request");
            return Err(AppError::Upstream(format!(
                "Token request failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        let (client_id, client_secret) = self.credentials()?;
        self.token_request(&[
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let (client_id, client_secret) = self.credentials()?;
        self.token_request(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn insert_event(
        &self,
        access_token: &str,
        event: &CalendarEvent,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .post(EVENTS_URL)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Event insert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}
