// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile persistence with goal and dietary tag sets.

use crate::db::DataStore;
use crate::error::{AppError, Result};
use crate::models::{Profile, TagKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

/// Placeholder choice meaning "no dietary restriction".
const NO_RESTRICTION: &str = "None";

/// Profile plus both tag sets, as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub onboarded: bool,
    pub goals: Vec<String>,
    pub dietary_restrictions: Vec<String>,
}

/// Onboarding / settings form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveProfile {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub display_name: String,
    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    pub age: Option<u32>,
    #[validate(range(min = 50, max = 300, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: Option<u32>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// Changes needed to turn the stored tag set into the desired one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Trimmed, de-duplicated, non-empty values. The "None" placeholder is
/// dropped from dietary restrictions.
pub fn normalize_tags(kind: TagKind, values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .filter(|v| !(kind == TagKind::DietaryRestriction && *v == NO_RESTRICTION))
        .map(str::to_string)
        .collect()
}

/// Set difference between what is stored and what is wanted.
pub fn reconcile_tags(current: &[String], desired: &BTreeSet<String>) -> TagDiff {
    let current: BTreeSet<&str> = current.iter().map(String::as_str).collect();

    TagDiff {
        to_add: desired
            .iter()
            .filter(|v| !current.contains(v.as_str()))
            .cloned()
            .collect(),
        to_remove: current
            .iter()
            .filter(|v| !desired.contains(**v))
            .map(|v| v.to_string())
            .collect(),
    }
}

async fn load_tags(store: &dyn DataStore, user_id: Uuid, kind: TagKind) -> Result<Vec<String>> {
    match store.list_tags(user_id, kind).await {
        Ok(mut values) => {
            values.sort();
            Ok(values)
        }
        Err(e) if e.is_not_provisioned() => Ok(vec![]),
        Err(e) => Err(AppError::store("Failed to fetch profile", e)),
    }
}

pub async fn load(store: &dyn DataStore, user_id: Uuid) -> Result<ProfileView> {
    let profile = store
        .get_profile(user_id)
        .await
        .map_err(|e| AppError::store("Failed to fetch profile", e))?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

    Ok(ProfileView {
        onboarded: profile.is_onboarded(),
        goals: load_tags(store, user_id, TagKind::Goal).await?,
        dietary_restrictions: load_tags(store, user_id, TagKind::DietaryRestriction).await?,
        profile,
    })
}

/// Whether the user has finished onboarding. Lookup failures count as "no".
pub async fn is_onboarded(store: &dyn DataStore, user_id: Uuid) -> bool {
    match store.get_profile(user_id).await {
        Ok(profile) => profile.is_some_and(|p| p.is_onboarded()),
        Err(e) => {
            if !e.is_not_provisioned() {
                tracing::warn!(error = %e, "Failed to check onboarding state");
            }
            false
        }
    }
}

async fn apply_tags(
    store: &dyn DataStore,
    user_id: Uuid,
    kind: TagKind,
    values: &[String],
) -> Result<()> {
    let current = store
        .list_tags(user_id, kind)
        .await
        .map_err(|e| AppError::store("Failed to save preferences", e))?;
    let diff = reconcile_tags(&current, &normalize_tags(kind, values));
    if diff.is_empty() {
        return Ok(());
    }

    store
        .delete_tags(user_id, kind, &diff.to_remove)
        .await
        .map_err(|e| AppError::store("Failed to save preferences", e))?;
    store
        .insert_tags(user_id, kind, &diff.to_add)
        .await
        .map_err(|e| AppError::store("Failed to save preferences", e))?;

    tracing::debug!(
        ?kind,
        added = diff.to_add.len(),
        removed = diff.to_remove.len(),
        "Reconciled profile tags"
    );
    Ok(())
}

/// Upsert the profile and reconcile both tag sets. Concurrent saves are
/// last-write-wins.
pub async fn save(
    store: &dyn DataStore,
    user_id: Uuid,
    email: Option<String>,
    form: SaveProfile,
    now: DateTime<Utc>,
) -> Result<ProfileView> {
    let existing = store
        .get_profile(user_id)
        .await
        .map_err(|e| AppError::store("Failed to save profile", e))?;

    let profile = Profile {
        id: user_id,
        email: email.or_else(|| existing.as_ref().and_then(|p| p.email.clone())),
        display_name: Some(form.display_name.trim().to_string()),
        age: form.age,
        height_cm: form.height_cm,
        weight_kg: form.weight_kg,
        activity_level: form.activity_level,
        created_at: existing.map(|p| p.created_at).unwrap_or(now),
        updated_at: now,
    };

    store
        .upsert_profile(&profile)
        .await
        .map_err(|e| AppError::store("Failed to save profile", e))?;

    apply_tags(store, user_id, TagKind::Goal, &form.goals).await?;
    apply_tags(
        store,
        user_id,
        TagKind::DietaryRestriction,
        &form.dietary_restrictions,
    )
    .await?;

    tracing::info!(user_id = %user_id, "Profile saved");

    load(store, user_id).await
}
