// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and onboarding routes.

use crate::error::Result;
use crate::extract::AppJson;
use crate::middleware::AuthUser;
use crate::services::profile::{self, ProfileView, SaveProfile};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).put(put_profile))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileView>> {
    Ok(Json(profile::load(state.store.as_ref(), user.user_id).await?))
}

/// Save onboarding answers or later edits.
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(form): AppJson<SaveProfile>,
) -> Result<Json<ProfileView>> {
    form.validate()?;

    let view = profile::save(
        state.store.as_ref(),
        user.user_id,
        user.email,
        form,
        Utc::now(),
    )
    .await?;

    Ok(Json(view))
}
