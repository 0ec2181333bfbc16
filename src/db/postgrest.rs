// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Managed backend client speaking the PostgREST dialect over HTTP.
//!
//! Provides typed operations for:
//! - Workouts and meals (schedule records)
//! - Profiles, goals and dietary preferences
//! - External integrations (OAuth credentials)
//! - Health tracking entries
//!
//! The client authenticates with the service key, so every query carries an
//! explicit `user_id` filter.

use super::{tables, DataStore, StoreError, StoreResult};
use crate::models::{
    DateBounds, DateRange, ExternalIntegration, HealthEntry, HealthMetric, Meal, MealUpdate,
    NewHealthEntry, NewIntegration, NewMeal, NewWorkout, Profile, TagKind, Workout,
    WorkoutUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// PostgREST error codes meaning the schema has not been applied.
const NOT_PROVISIONED_CODES: [&str; 3] = ["PGRST204", "PGRST205", "42P01"];

const WORKOUT_ORDER: &str = "scheduled_date.asc,scheduled_time.asc";

/// REST client for the managed backend.
#[derive(Clone)]
pub struct PostgrestStore {
    http: reqwest::Client,
    rest_url: String,
    service_key: String,
}

/// Error body returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Map a failed response to a store error. Missing relations become
/// `NotProvisioned` here so nothing downstream needs to look at messages.
pub fn classify_error(table: &str, status: u16, body: &str) -> StoreError {
    let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_default();
    let message = parsed.message.unwrap_or_else(|| body.to_string());
    let details = parsed.details.unwrap_or_default();

    let missing_relation = NOT_PROVISIONED_CODES.contains(&code.as_str())
        || message.contains("Could not find the table")
        || message.contains("schema cache")
        || (message.contains("relation") && message.contains("does not exist"))
        || (status == 404 && details.contains("table"));

    if missing_relation {
        return StoreError::NotProvisioned {
            table: table.to_string(),
        };
    }

    StoreError::Backend {
        code: if code.is_empty() {
            status.to_string()
        } else {
            code
        },
        message,
    }
}

/// Render a PostgREST `in.(...)` filter with quoted values.
fn in_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Row shapes for the tag tables.
#[derive(Serialize)]
struct GoalRow<'a> {
    user_id: Uuid,
    goal_type: &'a str,
}

#[derive(Deserialize)]
struct GoalValue {
    goal_type: String,
}

#[derive(Serialize)]
struct DietaryRow<'a> {
    user_id: Uuid,
    preference_type: &'static str,
    value: &'a str,
}

#[derive(Deserialize)]
struct DietaryValue {
    value: String,
}

#[derive(Serialize)]
struct IntegrationRow<'a> {
    user_id: Uuid,
    provider: &'a str,
    access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    token_expires_at: DateTime<Utc>,
    is_active: bool,
    last_synced_at: DateTime<Utc>,
}

impl PostgrestStore {
    /// Create a client for `{base_url}/rest/v1`.
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::Http(e.to_string()))?;

        tracing::info!(url = base_url, "Using managed backend data store");

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Send and decode a JSON array, classifying failures.
    async fn send<T: DeserializeOwned>(
        &self,
        table: &str,
        request: reqwest::RequestBuilder,
    ) -> StoreResult<Vec<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(table, status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*")])
            .query(query);
        self.send(table, request).await
    }

    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        rows: &B,
    ) -> StoreResult<Vec<T>> {
        let request = self
            .request(reqwest::Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows);
        self.send(table, request).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> StoreResult<Vec<T>> {
        let request = self
            .request(reqwest::Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(query)
            .json(body);
        self.send(table, request).await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self
            .request(reqwest::Method::DELETE, table)
            .header("Prefer", "return=representation")
            .query(query);
        self.send(table, request).await
    }

    fn range_query(user_id: Uuid, range: DateRange) -> Vec<(&'static str, String)> {
        vec![
            ("user_id", eq(user_id)),
            ("scheduled_date", format!("gte.{}", range.start)),
            ("scheduled_date", format!("lt.{}", range.end)),
            ("order", WORKOUT_ORDER.to_string()),
        ]
    }

    fn bounds_query(user_id: Uuid, bounds: DateBounds) -> Vec<(&'static str, String)> {
        let mut query = vec![("user_id", eq(user_id))];
        if let Some(from) = bounds.from {
            query.push(("date", format!("gte.{}", from)));
        }
        if let Some(to) = bounds.to {
            query.push(("date", format!("lte.{}", to)));
        }
        query.push(("order", "date.desc".to_string()));
        query
    }

    fn owned_query(user_id: Uuid, id: Uuid) -> Vec<(&'static str, String)> {
        vec![("id", eq(id)), ("user_id", eq(user_id))]
    }
}

#[async_trait]
impl DataStore for PostgrestStore {
    // ─── Workouts ────────────────────────────────────────────────

    async fn insert_workouts(&self, workouts: Vec<NewWorkout>) -> StoreResult<Vec<Workout>> {
        if workouts.is_empty() {
            return Ok(vec![]);
        }
        self.insert(tables::WORKOUTS, &workouts).await
    }

    async fn list_workouts(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Workout>> {
        self.select(tables::WORKOUTS, &Self::range_query(user_id, range))
            .await
    }

    async fn update_workout(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &WorkoutUpdate,
    ) -> StoreResult<Option<Workout>> {
        let rows: Vec<Workout> = self
            .patch(tables::WORKOUTS, &Self::owned_query(user_id, id), update)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_workout(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let rows: Vec<serde_json::Value> = self
            .delete(tables::WORKOUTS, &Self::owned_query(user_id, id))
            .await?;
        Ok(!rows.is_empty())
    }

    // ─── Meals ───────────────────────────────────────────────────

    async fn insert_meals(&self, meals: Vec<NewMeal>) -> StoreResult<Vec<Meal>> {
        if meals.is_empty() {
            return Ok(vec![]);
        }
        self.insert(tables::MEALS, &meals).await
    }

    async fn list_meals(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Meal>> {
        self.select(tables::MEALS, &Self::range_query(user_id, range))
            .await
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &MealUpdate,
    ) -> StoreResult<Option<Meal>> {
        let rows: Vec<Meal> = self
            .patch(tables::MEALS, &Self::owned_query(user_id, id), update)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_meal(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let rows: Vec<serde_json::Value> = self
            .delete(tables::MEALS, &Self::owned_query(user_id, id))
            .await?;
        Ok(!rows.is_empty())
    }

    // ─── Profiles & tags ─────────────────────────────────────────

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        let rows: Vec<Profile> = self
            .select(tables::PROFILES, &[("id", eq(user_id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, profile: &Profile) -> StoreResult<Profile> {
        let request = self
            .request(reqwest::Method::POST, tables::PROFILES)
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .query(&[("on_conflict", "id")])
            .json(profile);
        let rows: Vec<Profile> = self.send(tables::PROFILES, request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("profile upsert returned no rows".to_string()))
    }

    async fn list_tags(&self, user_id: Uuid, kind: TagKind) -> StoreResult<Vec<String>> {
        match kind {
            TagKind::Goal => {
                let rows: Vec<GoalValue> = self
                    .select(tables::USER_GOALS, &[("user_id", eq(user_id))])
                    .await?;
                Ok(rows.into_iter().map(|r| r.goal_type).collect())
            }
            TagKind::DietaryRestriction => {
                let rows: Vec<DietaryValue> = self
                    .select(
                        tables::DIETARY_PREFERENCES,
                        &[
                            ("user_id", eq(user_id)),
                            ("preference_type", eq("restriction")),
                        ],
                    )
                    .await?;
                Ok(rows.into_iter().map(|r| r.value).collect())
            }
        }
    }

    async fn insert_tags(
        &self,
        user_id: Uuid,
        kind: TagKind,
        values: &[String],
    ) -> StoreResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let _: Vec<serde_json::Value> = match kind {
            TagKind::Goal => {
                let rows: Vec<GoalRow> = values
                    .iter()
                    .map(|v| GoalRow {
                        user_id,
                        goal_type: v,
                    })
                    .collect();
                self.insert(tables::USER_GOALS, &rows).await?
            }
            TagKind::DietaryRestriction => {
                let rows: Vec<DietaryRow> = values
                    .iter()
                    .map(|v| DietaryRow {
                        user_id,
                        preference_type: "restriction",
                        value: v,
                    })
                    .collect();
                self.insert(tables::DIETARY_PREFERENCES, &rows).await?
            }
        };
        Ok(())
    }

    async fn delete_tags(
        &self,
        user_id: Uuid,
        kind: TagKind,
        values: &[String],
    ) -> StoreResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let (table, column) = match kind {
            TagKind::Goal => (tables::USER_GOALS, "goal_type"),
            TagKind::DietaryRestriction => (tables::DIETARY_PREFERENCES, "value"),
        };
        let _: Vec<serde_json::Value> = self
            .delete(
                table,
                &[("user_id", eq(user_id)), (column, in_list(values))],
            )
            .await?;
        Ok(())
    }

    // ─── Integrations ────────────────────────────────────────────

    async fn find_active_integration(
        &self,
        user_id: Uuid,
        provider: &str,
    ) -> StoreResult<Option<ExternalIntegration>> {
        let rows: Vec<ExternalIntegration> = self
            .select(
                tables::EXTERNAL_INTEGRATIONS,
                &[
                    ("user_id", eq(user_id)),
                    ("provider", eq(provider)),
                    ("is_active", eq(true)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_integration(&self, new: NewIntegration) -> StoreResult<ExternalIntegration> {
        let row = IntegrationRow {
            user_id: new.user_id,
            provider: &new.provider,
            access_token: &new.access_token,
            refresh_token: new.refresh_token.as_deref(),
            token_expires_at: new.token_expires_at,
            is_active: true,
            last_synced_at: Utc::now(),
        };
        let request = self
            .request(reqwest::Method::POST, tables::EXTERNAL_INTEGRATIONS)
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .query(&[("on_conflict", "user_id,provider")])
            .json(&row);
        let rows: Vec<ExternalIntegration> =
            self.send(tables::EXTERNAL_INTEGRATIONS, request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("integration upsert returned no rows".to_string()))
    }

    async fn update_integration_token(
        &self,
        id: Uuid,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let body = serde_json::json!({
            "access_token": access_token,
            "token_expires_at": expires_at,
        });
        let _: Vec<serde_json::Value> = self
            .patch(tables::EXTERNAL_INTEGRATIONS, &[("id", eq(id))], &body)
            .await?;
        Ok(())
    }

    async fn mark_integration_synced(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let body = serde_json::json!({ "last_synced_at": at });
        let _: Vec<serde_json::Value> = self
            .patch(tables::EXTERNAL_INTEGRATIONS, &[("id", eq(id))], &body)
            .await?;
        Ok(())
    }

    async fn deactivate_integration(&self, user_id: Uuid, provider: &str) -> StoreResult<bool> {
        let body = serde_json::json!({ "is_active": false });
        let rows: Vec<serde_json::Value> = self
            .patch(
                tables::EXTERNAL_INTEGRATIONS,
                &[
                    ("user_id", eq(user_id)),
                    ("provider", eq(provider)),
                    ("is_active", eq(true)),
                ],
                &body,
            )
            .await?;
        Ok(!rows.is_empty())
    }

    // ─── Health tracking ─────────────────────────────────────────

    async fn insert_health_entry(&self, entry: NewHealthEntry) -> StoreResult<HealthEntry> {
        let table = tables::health(entry.reading.metric());
        let rows: Vec<HealthEntry> = self.insert(table, &[entry]).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("health insert returned no rows".to_string()))
    }

    async fn list_health_entries(
        &self,
        user_id: Uuid,
        metric: HealthMetric,
        bounds: DateBounds,
    ) -> StoreResult<Vec<HealthEntry>> {
        self.select(tables::health(metric), &Self::bounds_query(user_id, bounds))
            .await
    }
}
