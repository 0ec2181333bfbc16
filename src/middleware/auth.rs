// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use crate::error::AppError;
use crate::services::SessionUser;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

/// Cookie the identity provider's client library stores the session in.
pub const SESSION_COOKIE: &str = "sb-access-token";

/// Authenticated user extracted from the session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Session token from the cookie, falling back to a bearer header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the session for handlers that work with or without one.
pub async fn session_user(
    state: &AppState,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<Option<SessionUser>, AppError> {
    match session_token(jar, headers) {
        Some(token) => state.identity.authenticate(&token).await,
        None => Ok(None),
    }
}

/// Middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_user(&state, &jar, request.headers())
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}
