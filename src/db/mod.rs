// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! `DataStore` is the seam between handlers and persistence. Two backends
//! implement it: `MemoryStore` for local runs and tests, and `PostgrestStore`
//! for the managed backend's REST interface.

pub mod memory;
pub mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

use crate::models::{
    DateBounds, DateRange, ExternalIntegration, HealthEntry, HealthMetric, Meal, MealUpdate,
    NewHealthEntry, NewIntegration, NewMeal, NewWorkout, Profile, TagKind, Workout,
    WorkoutUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Table names as constants.
pub mod tables {
    use crate::models::HealthMetric;

    pub const WORKOUTS: &str = "workouts";
    pub const MEALS: &str = "meals";
    pub const PROFILES: &str = "profiles";
    pub const USER_GOALS: &str = "user_goals";
    pub const DIETARY_PREFERENCES: &str = "dietary_preferences";
    pub const EXTERNAL_INTEGRATIONS: &str = "external_integrations";
    pub const SLEEP_TRACKING: &str = "sleep_tracking";
    pub const WEIGHT_TRACKING: &str = "weight_tracking";
    pub const WATER_INTAKE: &str = "water_intake";

    /// Table holding entries for `metric`.
    pub fn health(metric: HealthMetric) -> &'static str {
        match metric {
            HealthMetric::Sleep => SLEEP_TRACKING,
            HealthMetric::Weight => WEIGHT_TRACKING,
            HealthMetric::Water => WATER_INTAKE,
        }
    }
}

/// Store failures.
///
/// Missing tables are reported as their own variant so callers can degrade
/// to an empty result without inspecting error text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table '{table}' is not provisioned")]
    NotProvisioned { table: String },

    #[error("backend error {code}: {message}")]
    Backend { code: String, message: String },

    #[error("transport error: {0}")]
    Http(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, StoreError::NotProvisioned { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence operations, all scoped by user id.
#[async_trait]
pub trait DataStore: Send + Sync {
    // ─── Workouts ────────────────────────────────────────────────

    /// Bulk insert. Either every row is returned or the call fails.
    async fn insert_workouts(&self, workouts: Vec<NewWorkout>) -> StoreResult<Vec<Workout>>;

    /// Workouts within `range`, ordered by date then time.
    async fn list_workouts(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Workout>>;

    async fn update_workout(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &WorkoutUpdate,
    ) -> StoreResult<Option<Workout>>;

    async fn delete_workout(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;

    // ─── Meals ───────────────────────────────────────────────────

    async fn insert_meals(&self, meals: Vec<NewMeal>) -> StoreResult<Vec<Meal>>;

    /// Meals within `range`, ordered by date then time.
    async fn list_meals(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Meal>>;

    async fn update_meal(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &MealUpdate,
    ) -> StoreResult<Option<Meal>>;

    async fn delete_meal(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;

    // ─── Profiles & tags ─────────────────────────────────────────

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>>;

    async fn upsert_profile(&self, profile: &Profile) -> StoreResult<Profile>;

    /// Current tag values, in no particular order.
    async fn list_tags(&self, user_id: Uuid, kind: TagKind) -> StoreResult<Vec<String>>;

    async fn insert_tags(&self, user_id: Uuid, kind: TagKind, values: &[String])
        -> StoreResult<()>;

    async fn delete_tags(&self, user_id: Uuid, kind: TagKind, values: &[String])
        -> StoreResult<()>;

    // ─── Integrations ────────────────────────────────────────────

    async fn find_active_integration(
        &self,
        user_id: Uuid,
        provider: &str,
    ) -> StoreResult<Option<ExternalIntegration>>;

    /// Insert or replace on (user, provider); the row is left active.
    async fn upsert_integration(&self, new: NewIntegration) -> StoreResult<ExternalIntegration>;

    async fn update_integration_token(
        &self,
        id: Uuid,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;

    async fn mark_integration_synced(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Returns whether an active row was deactivated.
    async fn deactivate_integration(&self, user_id: Uuid, provider: &str) -> StoreResult<bool>;

    // ─── Health tracking ─────────────────────────────────────────

    /// Stored in the table for the reading's metric.
    async fn insert_health_entry(&self, entry: NewHealthEntry) -> StoreResult<HealthEntry>;

    /// Entries within `bounds`, newest date first.
    async fn list_health_entries(
        &self,
        user_id: Uuid,
        metric: HealthMetric,
        bounds: DateBounds,
    ) -> StoreResult<Vec<HealthEntry>>;
}
