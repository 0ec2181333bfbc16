// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process data store.
//!
//! Used when no managed backend is configured and by the test suite.
//! Per-user record lists keep insertion order, which is the tiebreak the
//! REST backend also exhibits for rows with equal sort keys.

use super::{tables, DataStore, StoreError, StoreResult};
use crate::models::{
    DateBounds, DateRange, ExternalIntegration, HealthEntry, HealthMetric, Meal, MealUpdate,
    NewHealthEntry, NewIntegration, NewMeal, NewWorkout, Profile, TagKind, Workout,
    WorkoutUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

/// In-memory store backed by concurrent maps.
#[derive(Default)]
pub struct MemoryStore {
    /// Workouts keyed by owner
    workouts: DashMap<Uuid, Vec<Workout>>,
    /// Meals keyed by owner
    meals: DashMap<Uuid, Vec<Meal>>,
    profiles: DashMap<Uuid, Profile>,
    tags: DashMap<(Uuid, TagKind), Vec<String>>,
    /// Integrations keyed by integration id
    integrations: DashMap<Uuid, ExternalIntegration>,
    health: DashMap<(Uuid, HealthMetric), Vec<HealthEntry>>,
    /// Tables that behave as if the schema had never been applied
    unprovisioned: DashSet<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `table` fail as not provisioned.
    pub fn mark_unprovisioned(&self, table: &'static str) {
        self.unprovisioned.insert(table);
    }

    fn check(&self, table: &'static str) -> StoreResult<()> {
        if self.unprovisioned.contains(table) {
            return Err(StoreError::NotProvisioned {
                table: table.to_string(),
            });
        }
        Ok(())
    }

    fn tag_table(kind: TagKind) -> &'static str {
        match kind {
            TagKind::Goal => tables::USER_GOALS,
            TagKind::DietaryRestriction => tables::DIETARY_PREFERENCES,
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    // ─── Workouts ────────────────────────────────────────────────

    async fn insert_workouts(&self, workouts: Vec<NewWorkout>) -> StoreResult<Vec<Workout>> {
        self.check(tables::WORKOUTS)?;
        let now = Utc::now();
        let created: Vec<Workout> = workouts
            .into_iter()
            .map(|w| w.into_workout(Uuid::new_v4(), now))
            .collect();

        for workout in &created {
            self.workouts
                .entry(workout.user_id)
                .or_default()
                .push(workout.clone());
        }
        Ok(created)
    }

    async fn list_workouts(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Workout>> {
        self.check(tables::WORKOUTS)?;
        let mut found: Vec<Workout> = self
            .workouts
            .get(&user_id)
            .map(|list| {
                list.iter()
                    .filter(|w| range.contains(w.scheduled_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|w| (w.scheduled_date, w.scheduled_time));
        Ok(found)
    }

    async fn update_workout(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &WorkoutUpdate,
    ) -> StoreResult<Option<Workout>> {
        self.check(tables::WORKOUTS)?;
        let Some(mut list) = self.workouts.get_mut(&user_id) else {
            return Ok(None);
        };
        Ok(list.iter_mut().find(|w| w.id == id).map(|w| {
            update.apply(w);
            w.clone()
        }))
    }

    async fn delete_workout(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        self.check(tables::WORKOUTS)?;
        let Some(mut list) = self.workouts.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|w| w.id != id);
        Ok(list.len() != before)
    }

    // ─── Meals ───────────────────────────────────────────────────

    async fn insert_meals(&self, meals: Vec<NewMeal>) -> StoreResult<Vec<Meal>> {
        self.check(tables::MEALS)?;
        let now = Utc::now();
        let created: Vec<Meal> = meals
            .into_iter()
            .map(|m| m.into_meal(Uuid::new_v4(), now))
            .collect();

        for meal in &created {
            self.meals
                .entry(meal.user_id)
                .or_default()
                .push(meal.clone());
        }
        Ok(created)
    }

    async fn list_meals(&self, user_id: Uuid, range: DateRange) -> StoreResult<Vec<Meal>> {
        self.check(tables::MEALS)?;
        let mut found: Vec<Meal> = self
            .meals
            .get(&user_id)
            .map(|list| {
                list.iter()
                    .filter(|m| range.contains(m.scheduled_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|m| (m.scheduled_date, m.scheduled_time));
        Ok(found)
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &MealUpdate,
    ) -> StoreResult<Option<Meal>> {
        self.check(tables::MEALS)?;
        let Some(mut list) = self.meals.get_mut(&user_id) else {
            return Ok(None);
        };
        Ok(list.iter_mut().find(|m| m.id == id).map(|m| {
            update.apply(m);
            m.clone()
        }))
    }

    async fn delete_meal(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        self.check(tables::MEALS)?;
        let Some(mut list) = self.meals.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|m| m.id != id);
        Ok(list.len() != before)
    }

    // ─── Profiles & tags ─────────────────────────────────────────

    async fn get_profile(&self, user_id: Uuid) -> StoreResult<Option<Profile>> {
        self.check(tables::PROFILES)?;
        Ok(self.profiles.get(&user_id).map(|p| p.clone()))
    }

    async fn upsert_profile(&self, profile: &Profile) -> StoreResult<Profile> {
        self.check(tables::PROFILES)?;
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile.clone())
    }

    async fn list_tags(&self, user_id: Uuid, kind: TagKind) -> StoreResult<Vec<String>> {
        self.check(Self::tag_table(kind))?;
        Ok(self
            .tags
            .get(&(user_id, kind))
            .map(|v| v.clone())
            .unwrap_or_default())
    }

    async fn insert_tags(
        &self,
        user_id: Uuid,
        kind: TagKind,
        values: &[String],
    ) -> StoreResult<()> {
        self.check(Self::tag_table(kind))?;
        self.tags
            .entry((user_id, kind))
            .or_default()
            .extend(values.iter().cloned());
        Ok(())
    }

    async fn delete_tags(
        &self,
        user_id: Uuid,
        kind: TagKind,
        values: &[String],
    ) -> StoreResult<()> {
        self.check(Self::tag_table(kind))?;
        if let Some(mut current) = self.tags.get_mut(&(user_id, kind)) {
            current.retain(|v| !values.contains(v));
        }
        Ok(())
    }

    // ─── Integrations ────────────────────────────────────────────

    async fn find_active_integration(
        &self,
        user_id: Uuid,
        provider: &str,
    ) -> StoreResult<Option<ExternalIntegration>> {
        self.check(tables::EXTERNAL_INTEGRATIONS)?;
        Ok(self
            .integrations
            .iter()
            .find(|i| i.user_id == user_id && i.provider == provider && i.is_active)
            .map(|i| i.value().clone()))
    }

    async fn upsert_integration(&self, new: NewIntegration) -> StoreResult<ExternalIntegration> {
        self.check(tables::EXTERNAL_INTEGRATIONS)?;
        let now = Utc::now();

        let existing_id = self
            .integrations
            .iter()
            .find(|i| i.user_id == new.user_id && i.provider == new.provider)
            .map(|i| *i.key());

        if let Some(id) = existing_id {
            if let Some(mut row) = self.integrations.get_mut(&id) {
                row.access_token = new.access_token;
                if new.refresh_token.is_some() {
                    row.refresh_token = new.refresh_token;
                }
                row.token_expires_at = new.token_expires_at;
                row.is_active = true;
                row.last_synced_at = Some(now);
                return Ok(row.clone());
            }
        }

        let row = ExternalIntegration {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            provider: new.provider,
            access_token: new.access_token,
            refresh_token: new.refresh_token,
            token_expires_at: new.token_expires_at,
            is_active: true,
            last_synced_at: Some(now),
            created_at: now,
        };
        self.integrations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_integration_token(
        &self,
        id: Uuid,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.check(tables::EXTERNAL_INTEGRATIONS)?;
        if let Some(mut row) = self.integrations.get_mut(&id) {
            row.access_token = access_token.to_string();
            row.token_expires_at = expires_at;
        }
        Ok(())
    }

    async fn mark_integration_synced(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        self.check(tables::EXTERNAL_INTEGRATIONS)?;
        if let Some(mut row) = self.integrations.get_mut(&id) {
            row.last_synced_at = Some(at);
        }
        Ok(())
    }

    async fn deactivate_integration(&self, user_id: Uuid, provider: &str) -> StoreResult<bool> {
        self.check(tables::EXTERNAL_INTEGRATIONS)?;
        let mut changed = false;
        for mut row in self.integrations.iter_mut() {
            if row.user_id == user_id && row.provider == provider && row.is_active {
                row.is_active = false;
                changed = true;
            }
        }
        Ok(changed)
    }

    // ─── Health tracking ─────────────────────────────────────────

    async fn insert_health_entry(&self, entry: NewHealthEntry) -> StoreResult<HealthEntry> {
        let metric = entry.reading.metric();
        self.check(tables::health(metric))?;
        let created = entry.into_entry(Uuid::new_v4(), Utc::now());
        self.health
            .entry((created.user_id, metric))
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn list_health_entries(
        &self,
        user_id: Uuid,
        metric: HealthMetric,
        bounds: DateBounds,
    ) -> StoreResult<Vec<HealthEntry>> {
        self.check(tables::health(metric))?;
        let mut found: Vec<HealthEntry> = self
            .health
            .get(&(user_id, metric))
            .map(|list| {
                list.iter()
                    .filter(|e| bounds.contains(e.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }
}
