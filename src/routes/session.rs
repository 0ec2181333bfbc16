// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session / onboarding gate for the frontend router.

use crate::error::Result;
use crate::middleware::auth::session_user;
use crate::services::{gate, profile};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", get(get_session))
}

#[derive(Deserialize)]
pub struct SessionParams {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub onboarded: bool,
    pub decision: String,
    pub redirect: Option<String>,
}

/// Decide whether the page at `path` may be shown.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionParams>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>> {
    let path = params.path.as_deref().unwrap_or(gate::HOME_PATH);

    let user = session_user(&state, &jar, &headers).await?;
    let onboarded = match &user {
        Some(user) => profile::is_onboarded(state.store.as_ref(), user.id).await,
        None => false,
    };

    let decision = gate::decide(path, user.is_some(), onboarded);

    Ok(Json(SessionResponse {
        authenticated: user.is_some(),
        onboarded,
        decision: decision.as_str().to_string(),
        redirect: decision.redirect_target().map(str::to_string),
    }))
}
