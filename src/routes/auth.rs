// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Calendar OAuth routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::auth::session_user;
use crate::models::{integration::PROVIDER_GOOGLE_CALENDAR, NewIntegration};
use crate::services::calendar::authorization_url;
use crate::services::gate::{LOGIN_PATH, ONBOARDING_PATH};
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub const CALLBACK_PATH: &str = "/api/auth/google/callback";

/// OAuth state older than this is rejected.
const STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/google", get(auth_start))
        .route(CALLBACK_PATH, get(auth_callback))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// App path to return to once the calendar is connected.
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Accept only local absolute paths so the flow cannot bounce elsewhere.
fn safe_return_path(path: Option<&str>) -> &str {
    match path {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p,
        _ => ONBOARDING_PATH,
    }
}

/// Public base URL of this API: configured, or derived from the Host header.
fn api_base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.api_url {
        return url.trim_end_matches('/').to_string();
    }

    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}", scheme, host)
}

fn callback_url(state: &AppState, headers: &HeaderMap) -> String {
    format!("{}{}", api_base_url(state, headers), CALLBACK_PATH)
}

fn now_ms() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Sign `path|timestamp_hex` and encode it for the `state` parameter.
fn sign_state(path: &str, timestamp_ms: u128, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", path, timestamp_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let signed = format!("{}|{}", payload, signature);
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and age, and return the embedded return path.
fn verify_state(state: &str, secret: &[u8], now_ms: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "path|timestamp_hex|signature_hex"
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let path = parts.next()?;

    let payload = format!("{}|{}", path, timestamp_hex);
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_ms = u128::from_str_radix(timestamp_hex, 16).ok()?;
    match now_ms.checked_sub(issued_ms) {
        Some(age) if age <= STATE_MAX_AGE_MS => Some(path.to_string()),
        _ => {
            tracing::warn!(issued_ms, now_ms, "OAuth state expired or issued in the future");
            None
        }
    }
}

/// Start OAuth flow - redirect to the Google consent screen.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let client_id = state.config.google_client_id.as_deref().ok_or_else(|| {
        AppError::NotConfigured(
            "Google OAuth not configured. Please add GOOGLE_CLIENT_ID to environment variables."
                .to_string(),
        )
    })?;

    let return_path = safe_return_path(params.redirect.as_deref());

    let oauth_state = sign_state(return_path, now_ms()?, &state.config.oauth_state_key)?;

    let redirect_uri = callback_url(&state, &headers);

    tracing::info!(
        return_path,
        redirect_uri = %redirect_uri,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&authorization_url(
        client_id,
        &redirect_uri,
        &oauth_state,
    )))
}

/// OAuth callback - exchange the code and store the integration.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Redirect {
    let frontend = state.config.frontend_url.trim_end_matches('/');
    let now = now_ms().ok();

    let return_path = params
        .state
        .as_deref()
        .zip(now)
        .and_then(|(s, now)| verify_state(s, &state.config.oauth_state_key, now))
        .filter(|p| safe_return_path(Some(p.as_str())) == p.as_str())
        .unwrap_or_else(|| {
            tracing::warn!("Invalid or missing state parameter, falling back to onboarding");
            ONBOARDING_PATH.to_string()
        });

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return Redirect::temporary(&format!(
            "{}{}?error={}",
            frontend,
            return_path,
            urlencoding::encode(&error)
        ));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("No authorization code received");
        return Redirect::temporary(&format!("{}{}?error=no_code", frontend, return_path));
    };

    let user = match session_user(&state, &jar, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("OAuth callback without a session, sending to login");
            return Redirect::temporary(&format!("{}{}", frontend, LOGIN_PATH));
        }
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed during OAuth callback");
            return Redirect::temporary(&format!("{}{}?error=auth_failed", frontend, return_path));
        }
    };

    match connect(&state, &headers, user.id, &code).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "Google Calendar connected");
            Redirect::temporary(&format!("{}{}?connected=true", frontend, return_path))
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "Google OAuth callback failed");
            Redirect::temporary(&format!("{}{}?error=auth_failed", frontend, return_path))
        }
    }
}

/// Exchange the code and upsert the integration row.
async fn connect(
    state: &AppState,
    headers: &HeaderMap,
    user_id: uuid::Uuid,
    code: &str,
) -> Result<()> {
    let redirect_uri = callback_url(state, headers);
    let tokens = state.calendar.exchange_code(code, &redirect_uri).await?;

    state
        .store
        .upsert_integration(NewIntegration {
            user_id,
            provider: PROVIDER_GOOGLE_CALENDAR.to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        })
        .await
        .map_err(|e| AppError::store("Failed to store tokens", e))?;

    Ok(())
}
